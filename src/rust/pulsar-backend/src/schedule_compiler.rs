// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Fold a schedule's timing constraints into per-resource instruction lists.
//!
//! The fold never touches the schedule itself. NCO frequencies discovered on
//! the way are accumulated per resource and returned with the result.

use indexmap::{IndexMap, IndexSet};

use crate::ir::{Resource, ResourceKind, Schedule};
use crate::memory_allocator::WaveformMemory;
use crate::pulse_normalizer::{PulsarModulations, normalize_pulse};
use crate::settings::CompilerSettings;
use crate::signature::{ContentKey, content_key};
use crate::utils::length_to_samples;
use crate::waveform_cache::{WaveformCache, adopt_modulation_frequency};
use crate::waveform_sampler::WaveformRegistry;
use crate::{Error, Result, Samples};

/// One scheduled event on a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionEntry {
    pub time: Samples,
    pub content_key: ContentKey,
    pub modulations: PulsarModulations,
}

#[derive(Debug, Clone)]
pub struct CompiledResource {
    /// Key of the resource in the schedule.
    pub name: String,
    pub resource: Resource,
    /// Sorted ascending by time, ties in insertion order.
    pub instructions: Vec<InstructionEntry>,
    pub waveforms: WaveformCache,
    pub memory: WaveformMemory,
    pub nco_frequency: Option<f64>,
    /// Latest end of any waveform on the resource, in samples.
    pub finish_time: Samples,
}

impl CompiledResource {
    pub fn kind(&self) -> ResourceKind {
        self.resource.kind
    }

    /// Number of samples of the waveform behind `key`.
    pub fn waveform_len(&self, key: &ContentKey) -> Option<Samples> {
        self.waveforms.get(key).map(|w| w.len() as Samples)
    }
}

#[derive(Debug, Clone)]
pub struct CompiledSchedule {
    /// Resources that received at least one pulse, in schedule order.
    pub resources: IndexMap<String, CompiledResource>,
    pub acquisitions: IndexSet<ContentKey>,
    pub sequence_duration: Samples,
}

struct ResourceState<'a> {
    resource: &'a Resource,
    instructions: Vec<InstructionEntry>,
    waveforms: WaveformCache,
    nco_frequency: Option<f64>,
    finish_time: Samples,
}

impl<'a> ResourceState<'a> {
    fn new(resource: &'a Resource) -> Self {
        ResourceState {
            resource,
            instructions: vec![],
            waveforms: WaveformCache::new(),
            nco_frequency: resource.nco_freq,
            finish_time: 0,
        }
    }
}

fn resolve_channel<'a>(channel: &'a str, settings: &CompilerSettings) -> (&'a str, bool) {
    match channel.strip_suffix(settings.acquisition_suffix.as_str()) {
        Some(stripped) => (stripped, true),
        None => (channel, false),
    }
}

pub fn compile_schedule(
    schedule: &Schedule,
    registry: &dyn WaveformRegistry,
    settings: &CompilerSettings,
) -> Result<CompiledSchedule> {
    let mut states: IndexMap<&str, ResourceState<'_>> = IndexMap::new();
    let mut acquisitions = IndexSet::new();
    let mut sequence_duration: Samples = 0;

    for constraint in &schedule.timing_constraints {
        let operation = schedule
            .operations
            .get(&constraint.operation_hash)
            .ok_or_else(|| Error::UnknownOperation {
                operation: constraint.operation_hash.clone(),
            })?;
        if operation.pulse_info.is_empty() {
            return Err(Error::EmptyOperation {
                operation: constraint.operation_hash.clone(),
            });
        }
        let abs_time = constraint
            .abs_time
            .ok_or_else(|| Error::UndeterminedTiming {
                schedule: schedule.name.clone(),
                operation: operation.name.clone(),
            })?;

        for pulse in &operation.pulse_info {
            let (modulations, normalized) = normalize_pulse(pulse)?;
            let t0 = abs_time + pulse.t0;
            let key = content_key(&normalized)?;

            let Some(channel) = pulse.channel.as_deref() else {
                continue;
            };
            let (channel, is_acquisition) = resolve_channel(channel, settings);
            if is_acquisition {
                acquisitions.insert(key.clone());
            }
            let resource = schedule
                .resources
                .get(channel)
                .ok_or_else(|| Error::UnknownChannel {
                    channel: channel.to_string(),
                    schedule: schedule.name.clone(),
                })?;
            let state = states
                .entry(channel)
                .or_insert_with(|| ResourceState::new(resource));

            let time = length_to_samples(t0, resource.sampling_rate);
            state.instructions.push(InstructionEntry {
                time,
                content_key: key.clone(),
                modulations,
            });

            if !state.waveforms.contains(&key) {
                let frequency = adopt_modulation_frequency(
                    resource,
                    state.nco_frequency,
                    &key,
                    pulse.freq_mod,
                )?;
                if frequency != state.nco_frequency {
                    pulsar_log::debug!(
                        "Resource '{}' adopts NCO frequency {:?} Hz",
                        channel,
                        frequency
                    );
                }
                state.nco_frequency = frequency;
            }
            let length = state
                .waveforms
                .get_or_compute(&key, &normalized, resource, registry)?
                .len() as Samples;
            state.finish_time = state.finish_time.max(time + length);
            sequence_duration = sequence_duration.max(state.finish_time);
        }
    }

    let mut resources = IndexMap::new();
    for name in schedule.resources.keys() {
        let Some(mut state) = states.shift_remove(name.as_str()) else {
            continue;
        };
        state.instructions.sort_by_key(|entry| entry.time);
        let memory = WaveformMemory::allocate(
            name,
            &state.waveforms,
            &acquisitions,
            settings
                .enforce_bank_capacity
                .then_some(state.resource.kind.traits().waveform_index_capacity),
        )?;
        resources.insert(
            name.clone(),
            CompiledResource {
                name: name.clone(),
                resource: state.resource.clone(),
                instructions: state.instructions,
                waveforms: state.waveforms,
                memory,
                nco_frequency: state.nco_frequency,
                finish_time: state.finish_time,
            },
        );
    }

    Ok(CompiledSchedule {
        resources,
        acquisitions,
        sequence_duration,
    })
}
