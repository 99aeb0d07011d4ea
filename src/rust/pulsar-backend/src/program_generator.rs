// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Emit the looping Q1 program of one compiled resource.
//!
//! Every program starts with a sync barrier followed by the `start` label and
//! ends with a jump back to it. The body is padded with waits so that each
//! program of a schedule takes exactly the sequence duration, which keeps all
//! sequencers in lock-step without further coordination.

use q1asm_generator::{Bank, Q1asmGenerator};

use crate::pulse_normalizer::PulsarModulations;
use crate::schedule_compiler::{CompiledResource, InstructionEntry};
use crate::settings::CompilerSettings;
use crate::{Error, InstructionContext, Result, Samples};

const START_LABEL: &str = "start";

struct ProgramBuilder<'a> {
    generator: Q1asmGenerator,
    settings: &'a CompilerSettings,
}

impl ProgramBuilder<'_> {
    fn comment<'c>(&self, text: &'c str) -> Option<&'c str> {
        self.settings.emit_comments.then_some(text)
    }

    fn wait(&mut self, duration: Samples, comment: &str) -> Result<()> {
        if duration > 0 {
            let comment = self.comment(comment);
            self.generator.add_wait(None, duration as u64, comment)?;
        }
        Ok(())
    }

    fn modulations(&mut self, bank: Bank, modulations: &PulsarModulations) -> Result<()> {
        if let Some(gain) = modulations.gain {
            let comment = self.comment("#Set gain");
            self.generator
                .add_set_gain(bank, gain, modulations.gain_q, comment)?;
        }
        if let Some(offset) = modulations.offset {
            self.generator.add_set_offset(bank, offset)?;
        }
        if let Some(phase) = modulations.phase {
            self.generator.add_set_phase(phase);
        }
        if let Some(phase_delta) = modulations.phase_delta {
            self.generator.add_set_phase_delta(phase_delta);
        }
        Ok(())
    }

    fn pulse(
        &mut self,
        resource: &CompiledResource,
        entry: &InstructionEntry,
        wait: Samples,
        duration: Samples,
    ) -> Result<()> {
        self.wait(wait, "#Wait")?;
        self.generator.add_line_break();
        let (bank, allocation) = resource.memory.lookup(&entry.content_key).ok_or_else(|| {
            Error::new(format!(
                "Waveform '{}' has no memory allocation",
                entry.content_key
            ))
        })?;
        self.modulations(bank, &entry.modulations)?;
        let (index_i, index_q) = (allocation.index_i(), allocation.index_q());
        match bank {
            Bank::Awg => self
                .generator
                .add_play::<&str>(None, index_i, index_q, duration as u64, None)?,
            Bank::Acq => self
                .generator
                .add_acquire::<&str>(None, index_i, index_q, duration as u64, None)?,
        }
        Ok(())
    }
}

fn context(resource: &CompiledResource, entry: &InstructionEntry) -> InstructionContext {
    InstructionContext {
        resource: resource.name.clone(),
        content_key: entry.content_key.clone(),
        time: entry.time,
    }
}

/// Generate the program of `resource`, padded to `sequence_duration` samples.
///
/// A pulse is cut short when the next instruction starts before its waveform
/// ends. Instructions starting before the previous one has finished are
/// rejected.
pub fn generate_program(
    resource: &CompiledResource,
    sequence_duration: Samples,
    settings: &CompilerSettings,
) -> Result<Q1asmGenerator> {
    let mut builder = ProgramBuilder {
        generator: Q1asmGenerator::new(resource.kind().traits()),
        settings,
    };
    let comment = builder.comment("#Sync with other sequencers");
    builder.generator.add_wait_sync(comment);
    builder.generator.add_set_marker(Some(START_LABEL), 1);

    if resource.finish_time > sequence_duration {
        return Err(Error::Overrun {
            resource: resource.name.clone(),
            sequence_duration,
            runtime: resource.finish_time,
        });
    }

    let mut clock: Samples = 0;
    let instructions = &resource.instructions;
    for (i, entry) in instructions.iter().enumerate() {
        let wait = entry.time - clock;
        if wait < 0 {
            return Err(Error::SchedulingConflict {
                previous: i
                    .checked_sub(1)
                    .map(|previous| context(resource, &instructions[previous])),
                current: context(resource, entry),
            });
        }
        let length = resource.waveform_len(&entry.content_key).ok_or_else(|| {
            Error::new(format!("Waveform '{}' was never sampled", entry.content_key))
        })?;
        let duration = match instructions.get(i + 1) {
            Some(next) => length.min(next.time - entry.time),
            None => length,
        };
        builder
            .pulse(resource, entry, wait, duration)
            .map_err(|e| e.at_instruction(context(resource, entry)))?;
        clock += duration + wait;
    }

    if let Some(last) = instructions.last() {
        builder
            .wait(sequence_duration - clock, "#Sync with other sequencers")
            .map_err(|e| e.at_instruction(context(resource, last)))?;
    }
    builder.generator.add_line_break();
    let comment = builder.comment("#Loop back to start");
    builder.generator.add_jmp(None, START_LABEL, comment);
    builder.generator.validate_labels()?;

    pulsar_log::diagnostic!(
        "Resource '{}': {} instructions, {} samples",
        resource.name,
        builder.generator.num_instructions(),
        builder.generator.total_duration()
    );
    Ok(builder.generator)
}
