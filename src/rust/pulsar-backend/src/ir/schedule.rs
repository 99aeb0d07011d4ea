// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use q1asm_generator::SequencerTraits;
use q1asm_generator::sequencer_traits::{PULSAR_QCM_TRAITS, PULSAR_QRM_TRAITS};
use serde::{Deserialize, Serialize};

use crate::ir::pulse::PulseDescription;

pub type OperationId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub pulse_info: Vec<PulseDescription>,
}

/// Absolute placement of an operation, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConstraint {
    pub operation_hash: OperationId,
    #[serde(default)]
    pub abs_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Playback sequencer (control module).
    Awg,
    /// Acquisition sequencer (readout module).
    Acq,
}

impl ResourceKind {
    /// Whether all pulses of the sequencer share one NCO frequency.
    pub fn shares_nco(&self) -> bool {
        matches!(self, ResourceKind::Awg)
    }

    pub fn traits(&self) -> &'static SequencerTraits {
        match self {
            ResourceKind::Awg => &PULSAR_QCM_TRAITS,
            ResourceKind::Acq => &PULSAR_QRM_TRAITS,
        }
    }
}

/// A sequencer channel that pulses can be played on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    /// Samples per second.
    pub sampling_rate: f64,
    /// Initial NCO frequency; unset or zero lets the first modulated pulse decide.
    #[serde(default)]
    pub nco_freq: Option<f64>,
    #[serde(default)]
    pub seq_idx: u32,
    #[serde(default)]
    pub instrument_name: Option<String>,
    /// Opaque instrument settings passed through to the output.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Resource {
    pub fn new(name: &str, kind: ResourceKind, sampling_rate: f64) -> Self {
        Resource {
            name: name.to_string(),
            kind,
            sampling_rate,
            nco_freq: None,
            seq_idx: 0,
            instrument_name: None,
            data: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    #[serde(default)]
    pub operations: IndexMap<OperationId, Operation>,
    #[serde(default)]
    pub timing_constraints: Vec<TimingConstraint>,
    #[serde(default)]
    pub resources: IndexMap<String, Resource>,
}

impl Schedule {
    pub fn new(name: &str) -> Self {
        Schedule {
            name: name.to_string(),
            operations: IndexMap::new(),
            timing_constraints: vec![],
            resources: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_schedule() {
        let json = r#"{
            "name": "rabi",
            "operations": {
                "op0": {"name": "X", "pulse_info": [
                    {"channel": "q0", "t0": 0.0, "duration": 2e-8, "wf_func": "square", "amp": 0.5}
                ]}
            },
            "timing_constraints": [
                {"operation_hash": "op0", "abs_time": 0.0},
                {"operation_hash": "op0"}
            ],
            "resources": {
                "q0": {"name": "q0", "kind": "awg", "sampling_rate": 1e9}
            }
        }"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.name, "rabi");
        assert_eq!(schedule.operations["op0"].pulse_info.len(), 1);
        assert_eq!(schedule.timing_constraints[0].abs_time, Some(0.0));
        assert_eq!(schedule.timing_constraints[1].abs_time, None);
        let resource = &schedule.resources["q0"];
        assert_eq!(resource.kind, ResourceKind::Awg);
        assert_eq!(resource.nco_freq, None);
        assert!(resource.kind.shares_nco());
        assert!(!ResourceKind::Acq.shares_nco());
    }
}
