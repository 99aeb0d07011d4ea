// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Compiler backend turning a timed pulse schedule into Q1 assembly programs.
//!
//! The pipeline runs in four stages:
//!
//! 1. [`schedule_compiler`] folds the timing constraints into per-resource
//!    instruction lists, samples every distinct waveform once and determines
//!    the schedule wide sequence duration.
//! 2. [`memory_allocator`] assigns waveform memory slots per bank.
//! 3. [`program_generator`] emits one looping program per resource, padded
//!    to the common sequence duration.
//! 4. [`result`] packages waveforms and program into a sequencer configuration.

pub mod error;
pub mod generate_code;
pub mod ir;
pub mod memory_allocator;
pub mod program_generator;
pub mod pulse_normalizer;
pub mod result;
pub mod schedule_compiler;
pub mod settings;
pub mod signature;
pub(crate) mod utils;
pub mod waveform_cache;
pub mod waveform_sampler;

pub use error::{Error, InstructionContext, Result};
pub use generate_code::generate_sequencer_configs;
pub use result::SequencerConfig;
pub use settings::CompilerSettings;

/// Time on the sequencer timeline, in samples (one sample per clock cycle).
pub type Samples = i64;
