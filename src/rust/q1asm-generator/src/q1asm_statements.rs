// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::Serialize;

use crate::quantize::PhaseParams;
use crate::{Samples, WaveIndex};

/// Waveform memory bank of a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Awg,
    Acq,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Awg => write!(f, "awg"),
            Bank::Acq => write!(f, "acq"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Q1asmInstruction {
    WaitSync,
    SetMarker {
        value: u32,
    },
    SetGain {
        bank: Bank,
        gain_i: i64,
        gain_q: i64,
    },
    SetOffset {
        bank: Bank,
        offset_i: i64,
        offset_q: i64,
    },
    SetPhase(PhaseParams),
    SetPhaseDelta(PhaseParams),
    Wait {
        duration: Samples,
    },
    Play {
        index_i: WaveIndex,
        index_q: WaveIndex,
        duration: Samples,
    },
    Acquire {
        index_i: WaveIndex,
        index_q: WaveIndex,
        duration: Samples,
    },
    Move {
        source: i64,
        target: String,
    },
    Jmp {
        target: String,
    },
}

impl Q1asmInstruction {
    pub fn mnemonic(&self) -> String {
        match self {
            Q1asmInstruction::WaitSync => "wait_sync".to_string(),
            Q1asmInstruction::SetMarker { .. } => "set_mrk".to_string(),
            Q1asmInstruction::SetGain { bank, .. } => format!("set_{bank}_gain"),
            Q1asmInstruction::SetOffset { bank, .. } => format!("set_{bank}_offs"),
            Q1asmInstruction::SetPhase(_) => "set_ph".to_string(),
            Q1asmInstruction::SetPhaseDelta(_) => "set_ph_delta".to_string(),
            Q1asmInstruction::Wait { .. } => "wait".to_string(),
            Q1asmInstruction::Play { .. } => "play".to_string(),
            Q1asmInstruction::Acquire { .. } => "acquire".to_string(),
            Q1asmInstruction::Move { .. } => "move".to_string(),
            Q1asmInstruction::Jmp { .. } => "jmp".to_string(),
        }
    }

    pub fn operands(&self) -> String {
        match self {
            Q1asmInstruction::WaitSync => String::new(),
            Q1asmInstruction::SetMarker { value } => value.to_string(),
            Q1asmInstruction::SetGain { gain_i, gain_q, .. } => format!("{gain_i},{gain_q}"),
            Q1asmInstruction::SetOffset {
                offset_i, offset_q, ..
            } => format!("{offset_i},{offset_q}"),
            Q1asmInstruction::SetPhase(p) | Q1asmInstruction::SetPhaseDelta(p) => {
                format!("{},{},{}", p.coarse, p.fine, p.ultrafine)
            }
            Q1asmInstruction::Wait { duration } => duration.to_string(),
            Q1asmInstruction::Play {
                index_i,
                index_q,
                duration,
            }
            | Q1asmInstruction::Acquire {
                index_i,
                index_q,
                duration,
            } => format!("{index_i},{index_q},{duration}"),
            Q1asmInstruction::Move { source, target } => format!("{source},{target}"),
            Q1asmInstruction::Jmp { target } => format!("@{target}"),
        }
    }

    /// Number of cycles the instruction occupies on the timeline, if timed.
    pub fn duration(&self) -> Option<Samples> {
        match self {
            Q1asmInstruction::Wait { duration }
            | Q1asmInstruction::Play { duration, .. }
            | Q1asmInstruction::Acquire { duration, .. } => Some(*duration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Q1asmStatement {
    Instruction {
        label: Option<String>,
        instruction: Q1asmInstruction,
        comment: Option<String>,
    },
    LineBreak,
}

impl Q1asmStatement {
    pub fn instruction(&self) -> Option<&Q1asmInstruction> {
        match self {
            Q1asmStatement::Instruction { instruction, .. } => Some(instruction),
            Q1asmStatement::LineBreak => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Q1asmStatement::Instruction { label, .. } => label.as_deref(),
            Q1asmStatement::LineBreak => None,
        }
    }
}

/// One row of the instruction listing: `(label, opcode, operands, comment)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Q1asmRow {
    pub label: String,
    pub mnemonic: String,
    pub operands: String,
    pub comment: String,
}

impl From<&Q1asmStatement> for Q1asmRow {
    fn from(statement: &Q1asmStatement) -> Self {
        match statement {
            Q1asmStatement::Instruction {
                label,
                instruction,
                comment,
            } => Q1asmRow {
                label: label
                    .as_ref()
                    .map(|l| format!("{l}:"))
                    .unwrap_or_default(),
                mnemonic: instruction.mnemonic(),
                operands: instruction.operands(),
                comment: comment.clone().unwrap_or_default(),
            },
            Q1asmStatement::LineBreak => Q1asmRow {
                label: String::new(),
                mnemonic: String::new(),
                operands: String::new(),
                comment: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_formatting() {
        let play = Q1asmInstruction::Play {
            index_i: 0,
            index_q: 1,
            duration: 100,
        };
        assert_eq!(play.mnemonic(), "play");
        assert_eq!(play.operands(), "0,1,100");
        assert_eq!(play.duration(), Some(100));

        let gain = Q1asmInstruction::SetGain {
            bank: Bank::Acq,
            gain_i: 100,
            gain_q: -100,
        };
        assert_eq!(gain.mnemonic(), "set_acq_gain");
        assert_eq!(gain.operands(), "100,-100");
        assert_eq!(gain.duration(), None);

        let jmp = Q1asmInstruction::Jmp {
            target: "start".to_string(),
        };
        assert_eq!(jmp.operands(), "@start");
    }

    #[test]
    fn test_row_from_statement() {
        let statement = Q1asmStatement::Instruction {
            label: Some("start".to_string()),
            instruction: Q1asmInstruction::SetMarker { value: 1 },
            comment: None,
        };
        let row = Q1asmRow::from(&statement);
        assert_eq!(row.label, "start:");
        assert_eq!(row.mnemonic, "set_mrk");
        assert_eq!(row.operands, "1");
        assert_eq!(row.comment, "");
        assert_eq!(statement.label(), Some("start"));
    }
}
