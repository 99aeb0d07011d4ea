// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

pub mod q1asm_generator;
pub mod q1asm_statements;
pub mod quantize;
pub mod sequencer_traits;

pub use q1asm_generator::Q1asmGenerator;
pub use q1asm_statements::{Bank, Q1asmInstruction, Q1asmRow, Q1asmStatement};
pub use quantize::PhaseParams;
pub use sequencer_traits::SequencerTraits;

pub type Samples = u64;
pub type WaveIndex = u32;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Duration {duration} is below the minimum instruction duration of {minimum} cycles")]
    DurationTooShort { duration: Samples, minimum: Samples },
    #[error("{parameter} value {value} is outside of the normalized range -1.0:1.0")]
    OutOfRange { parameter: &'static str, value: f64 },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new(msg: &str) -> Self {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
