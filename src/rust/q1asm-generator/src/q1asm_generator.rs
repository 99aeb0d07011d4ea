// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use anyhow::anyhow;
use indexmap::IndexSet;

use crate::q1asm_statements::{Bank, Q1asmInstruction, Q1asmRow, Q1asmStatement};
use crate::quantize::{calculate_phase_params, expand_from_normalized_range};
use crate::sequencer_traits::SequencerTraits;
use crate::{Error, Result, Samples, WaveIndex};

/// Split a duration into immediate sized chunks.
///
/// All chunks but the last are `immediate_max`, the last one carries the remainder.
pub fn split_duration(mut duration: Samples, immediate_max: Samples) -> Vec<Samples> {
    let mut split = vec![];
    while duration > immediate_max {
        split.push(immediate_max);
        duration -= immediate_max;
    }
    split.push(duration);
    split
}

fn format_row(row: &Q1asmRow, widths: (usize, usize, usize)) -> String {
    let (label_width, mnemonic_width, operands_width) = widths;
    let line = format!(
        "{:<label_width$} {:<mnemonic_width$} {:<operands_width$} {}",
        row.label, row.mnemonic, row.operands, row.comment
    );
    line.trim_end().to_string()
}

/// Builds a Q1 assembly program instruction by instruction.
///
/// Timed instructions whose duration does not fit into an immediate operand are
/// split into a run of instructions.
#[derive(Clone, Debug)]
pub struct Q1asmGenerator {
    traits: &'static SequencerTraits,
    statements: Vec<Q1asmStatement>,
}

impl Q1asmGenerator {
    pub fn new(traits: &'static SequencerTraits) -> Self {
        Self {
            traits,
            statements: Vec::new(),
        }
    }

    pub fn statements(&self) -> &Vec<Q1asmStatement> {
        &self.statements
    }

    pub fn num_statements(&self) -> usize {
        self.statements.len()
    }

    pub fn num_instructions(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| !matches!(s, Q1asmStatement::LineBreak))
            .count()
    }

    fn push<S: Into<String>>(
        &mut self,
        label: Option<S>,
        instruction: Q1asmInstruction,
        comment: Option<S>,
    ) {
        self.statements.push(Q1asmStatement::Instruction {
            label: label.map(|s| s.into()),
            instruction,
            comment: comment.map(|s| s.into()).filter(|s| !s.is_empty()),
        });
    }

    /// Split the duration and validate the final chunk.
    fn checked_split(&self, duration: Samples) -> Result<Vec<Samples>> {
        let split = split_duration(duration, self.traits.immediate_max);
        match split.last() {
            Some(&last) if last < self.traits.min_duration => Err(Error::DurationTooShort {
                duration: last,
                minimum: self.traits.min_duration,
            }),
            _ => Ok(split),
        }
    }

    fn add_timed<S, F>(
        &mut self,
        label: Option<S>,
        duration: Samples,
        comment: Option<S>,
        make: F,
    ) -> Result<()>
    where
        S: Into<String>,
        F: Fn(Samples) -> Q1asmInstruction,
    {
        let split = self.checked_split(duration)?;
        if split.len() > 1 {
            pulsar_log::debug!(
                "Splitting duration {} into {} instructions",
                duration,
                split.len()
            );
        }
        let mut label: Option<String> = label.map(|s| s.into());
        let comment: Option<String> = comment.map(|s| s.into());
        for chunk in split {
            self.push(label.take(), make(chunk), comment.clone());
        }
        Ok(())
    }

    pub fn add_line_break(&mut self) {
        self.statements.push(Q1asmStatement::LineBreak);
    }

    pub fn add_wait_sync<S: Into<String>>(&mut self, comment: Option<S>) {
        self.push(None, Q1asmInstruction::WaitSync, comment);
    }

    pub fn add_set_marker<S: Into<String>>(&mut self, label: Option<S>, value: u32) {
        self.push(label, Q1asmInstruction::SetMarker { value }, None);
    }

    /// Set the gain registers from voltages.
    ///
    /// Without a separate quadrature gain the in-phase immediate is reused.
    pub fn add_set_gain<S: Into<String>>(
        &mut self,
        bank: Bank,
        gain: f64,
        gain_q: Option<f64>,
        comment: Option<S>,
    ) -> Result<()> {
        let immediate_max = self.traits.immediate_max;
        let gain_i =
            expand_from_normalized_range(gain / self.traits.output_volt, "Gain", immediate_max)?;
        let gain_q = match gain_q {
            Some(gain_q) => expand_from_normalized_range(
                gain_q / self.traits.output_volt,
                "Gain",
                immediate_max,
            )?,
            None => gain_i,
        };
        self.push(
            None,
            Q1asmInstruction::SetGain {
                bank,
                gain_i,
                gain_q,
            },
            comment,
        );
        Ok(())
    }

    /// Set both offset registers from a normalized value.
    pub fn add_set_offset(&mut self, bank: Bank, offset: f64) -> Result<()> {
        let immediate = expand_from_normalized_range(offset, "Offset", self.traits.immediate_max)?;
        self.push::<String>(
            None,
            Q1asmInstruction::SetOffset {
                bank,
                offset_i: immediate,
                offset_q: immediate,
            },
            None,
        );
        Ok(())
    }

    pub fn add_set_phase(&mut self, degrees: f64) {
        let params = calculate_phase_params(degrees, self.traits);
        self.push::<String>(None, Q1asmInstruction::SetPhase(params), None);
    }

    pub fn add_set_phase_delta(&mut self, degrees: f64) {
        let params = calculate_phase_params(degrees, self.traits);
        self.push::<String>(None, Q1asmInstruction::SetPhaseDelta(params), None);
    }

    pub fn add_wait<S: Into<String>>(
        &mut self,
        label: Option<S>,
        duration: Samples,
        comment: Option<S>,
    ) -> Result<()> {
        self.add_timed(label, duration, comment, |duration| {
            Q1asmInstruction::Wait { duration }
        })
    }

    pub fn add_play<S: Into<String>>(
        &mut self,
        label: Option<S>,
        index_i: WaveIndex,
        index_q: WaveIndex,
        duration: Samples,
        comment: Option<S>,
    ) -> Result<()> {
        self.add_timed(label, duration, comment, |duration| {
            Q1asmInstruction::Play {
                index_i,
                index_q,
                duration,
            }
        })
    }

    pub fn add_acquire<S: Into<String>>(
        &mut self,
        label: Option<S>,
        index_i: WaveIndex,
        index_q: WaveIndex,
        duration: Samples,
        comment: Option<S>,
    ) -> Result<()> {
        self.add_timed(label, duration, comment, |duration| {
            Q1asmInstruction::Acquire {
                index_i,
                index_q,
                duration,
            }
        })
    }

    pub fn add_move<S: Into<String>>(
        &mut self,
        label: Option<S>,
        source: i64,
        target: S,
        comment: Option<S>,
    ) {
        self.push(
            label,
            Q1asmInstruction::Move {
                source,
                target: target.into(),
            },
            comment,
        );
    }

    pub fn add_jmp<S: Into<String>>(&mut self, label: Option<S>, target: S, comment: Option<S>) {
        self.push(
            label,
            Q1asmInstruction::Jmp {
                target: target.into(),
            },
            comment,
        );
    }

    /// Sum of the durations of all timed instructions.
    pub fn total_duration(&self) -> Samples {
        self.statements
            .iter()
            .filter_map(|s| s.instruction().and_then(Q1asmInstruction::duration))
            .sum()
    }

    /// Check that labels are unique and every jump targets a defined label.
    pub fn validate_labels(&self) -> Result<()> {
        let mut labels = IndexSet::new();
        for label in self.statements.iter().filter_map(Q1asmStatement::label) {
            if !labels.insert(label) {
                return Err(anyhow!("Label '{label}' is defined more than once").into());
            }
        }
        let undefined = self
            .statements
            .iter()
            .filter_map(|s| match s.instruction() {
                Some(Q1asmInstruction::Jmp { target }) => Some(target.as_str()),
                _ => None,
            })
            .find(|target| !labels.contains(target));
        match undefined {
            Some(target) => Err(anyhow!("Jump target '@{target}' is not a defined label").into()),
            None => Ok(()),
        }
    }

    pub fn rows(&self) -> Vec<Q1asmRow> {
        self.statements.iter().map(Q1asmRow::from).collect()
    }

    /// Render the program as a column aligned listing.
    pub fn generate_q1asm(&self) -> String {
        let rows = self.rows();
        let widths = rows.iter().fold((0, 0, 0), |(l, m, o), row| {
            (
                l.max(row.label.len()),
                m.max(row.mnemonic.len()),
                o.max(row.operands.len()),
            )
        });
        rows.iter()
            .map(|row| format_row(row, widths) + "\n")
            .collect()
    }
}
