// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use q1asm_generator::{Q1asmGenerator, Q1asmRow, WaveIndex};
use serde::Serialize;

use crate::ir::ResourceKind;
use crate::memory_allocator::MemoryBank;
use crate::schedule_compiler::CompiledResource;

/// One quadrature of a waveform in sequencer memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformData {
    pub data: Vec<f64>,
    pub index: WaveIndex,
}

/// Waveform memory of both banks, keyed `<content_key>_I` / `<content_key>_Q`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WaveformsConfig {
    pub awg: IndexMap<String, WaveformData>,
    pub acq: IndexMap<String, WaveformData>,
}

fn bank_waveforms(bank: &MemoryBank) -> IndexMap<String, WaveformData> {
    let mut waveforms = IndexMap::new();
    for (key, allocation) in bank.iter() {
        waveforms.insert(
            format!("{key}_I"),
            WaveformData {
                data: allocation.samples.real(),
                index: allocation.index_i(),
            },
        );
        waveforms.insert(
            format!("{key}_Q"),
            WaveformData {
                data: allocation.samples.imag(),
                index: allocation.index_q(),
            },
        );
    }
    waveforms
}

/// Instrument settings of the sequencer running the program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentConfig {
    pub instrument_name: Option<String>,
    pub seq_idx: u32,
    pub kind: ResourceKind,
    pub sampling_rate: f64,
    pub nco_freq: f64,
    pub nco_phase: f64,
    pub data: serde_json::Value,
}

/// Everything a sequencer needs to run its part of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequencerConfig {
    pub waveforms: WaveformsConfig,
    pub program: String,
    #[serde(skip)]
    pub rows: Vec<Q1asmRow>,
    pub instrument_config: InstrumentConfig,
}

pub fn build_sequencer_config(
    compiled: &CompiledResource,
    program: &Q1asmGenerator,
) -> SequencerConfig {
    let resource = &compiled.resource;
    SequencerConfig {
        waveforms: WaveformsConfig {
            awg: bank_waveforms(&compiled.memory.awg),
            acq: bank_waveforms(&compiled.memory.acq),
        },
        program: program.generate_q1asm(),
        rows: program.rows(),
        instrument_config: InstrumentConfig {
            instrument_name: resource.instrument_name.clone(),
            seq_idx: resource.seq_idx,
            kind: resource.kind,
            sampling_rate: resource.sampling_rate,
            nco_freq: compiled.nco_frequency.unwrap_or(0.0),
            nco_phase: 0.0,
            data: resource.data.clone(),
        },
    }
}
