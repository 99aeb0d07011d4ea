// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use q1asm_generator::Bank;

use crate::Samples;
use crate::signature::ContentKey;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Identifies a single scheduled instruction on a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionContext {
    pub resource: String,
    pub content_key: ContentKey,
    pub time: Samples,
}

impl Display for InstructionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' at sample {} on '{}'",
            self.content_key, self.time, self.resource
        )
    }
}

fn describe_previous(previous: &Option<InstructionContext>) -> String {
    match previous {
        Some(previous) => format!("the end of {previous}"),
        None => "the start of the sequence".to_string(),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(
        "Absolute timing has not been determined for operation '{operation}' in schedule '{schedule}'"
    )]
    UndeterminedTiming { schedule: String, operation: String },
    #[error("Unknown waveform function '{wf_func}'")]
    UnsupportedWaveform { wf_func: String },
    #[error("Resource '{channel}' not available in schedule '{schedule}'")]
    UnknownChannel { channel: String, schedule: String },
    #[error(
        "Pulse '{pulse_id}' on resource '{resource}' has an inconsistent modulation frequency: expected {expected} but was {found}"
    )]
    InconsistentModulation {
        pulse_id: ContentKey,
        resource: String,
        expected: f64,
        found: f64,
    },
    #[error("{parameter} value {value} is outside of the normalized range -1.0:1.0")]
    OutOfRange { parameter: &'static str, value: f64 },
    #[error("Duration {duration} is below the minimum instruction duration of {minimum} cycles")]
    DurationTooShort { duration: u64, minimum: u64 },
    #[error("Instruction {current} is scheduled before {}", describe_previous(.previous))]
    SchedulingConflict {
        previous: Option<InstructionContext>,
        current: InstructionContext,
    },
    #[error(
        "Sequence duration {sequence_duration} of resource '{resource}' is less than its total runtime ({runtime})"
    )]
    Overrun {
        resource: String,
        sequence_duration: Samples,
        runtime: Samples,
    },
    #[error(
        "Resource '{resource}' requires {required} waveform slots in the {bank} bank, but only {capacity} are available"
    )]
    BankCapacityExceeded {
        resource: String,
        bank: Bank,
        required: usize,
        capacity: u32,
    },
    #[error("Operation '{operation}' is referenced by a timing constraint but not defined")]
    UnknownOperation { operation: String },
    #[error("Operation '{operation}' has no pulse info")]
    EmptyOperation { operation: String },
    #[error("Failed to emit {context}: {source}")]
    Instruction {
        context: InstructionContext,
        source: Box<Error>,
    },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }

    /// Wrap an error with the instruction it occurred at.
    pub fn at_instruction(self, context: InstructionContext) -> Self {
        Error::Instruction {
            context,
            source: Box::new(self),
        }
    }

    /// The underlying error, with instruction context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Instruction { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<q1asm_generator::Error> for Error {
    fn from(error: q1asm_generator::Error) -> Self {
        match error {
            q1asm_generator::Error::DurationTooShort { duration, minimum } => {
                Error::DurationTooShort { duration, minimum }
            }
            q1asm_generator::Error::OutOfRange { parameter, value } => {
                Error::OutOfRange { parameter, value }
            }
            q1asm_generator::Error::Anyhow(e) => Error::Anyhow(e),
        }
    }
}
