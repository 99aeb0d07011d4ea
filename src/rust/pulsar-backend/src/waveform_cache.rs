// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use indexmap::map::Entry;
use numeric_array::NumericArray;

use crate::ir::{PulseDescription, Resource};
use crate::signature::ContentKey;
use crate::waveform_sampler::{WaveformRegistry, sample_times};
use crate::{Error, Result};

/// Sampled waveforms of one resource, keyed by content.
///
/// Insertion order is the order in which pulses were first seen.
#[derive(Debug, Clone, Default)]
pub struct WaveformCache {
    waveforms: IndexMap<ContentKey, NumericArray>,
}

impl WaveformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ContentKey) -> Option<&NumericArray> {
        self.waveforms.get(key)
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.waveforms.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.waveforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentKey, &NumericArray)> {
        self.waveforms.iter()
    }

    /// Return the samples of `pulse`, sampling it only on first request.
    ///
    /// A pulse without waveform function samples to zeros.
    pub fn get_or_compute(
        &mut self,
        key: &ContentKey,
        pulse: &PulseDescription,
        resource: &Resource,
        registry: &dyn WaveformRegistry,
    ) -> Result<&NumericArray> {
        match self.waveforms.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let t = sample_times(pulse.duration, resource.sampling_rate);
                let samples = match pulse.wf_func.as_deref() {
                    Some(wf_func) => registry.sample(wf_func, &t, pulse)?,
                    None => NumericArray::Float64(vec![0.0; t.len()]),
                };
                Ok(entry.insert(samples))
            }
        }
    }
}

/// Resolve the NCO frequency of a resource after seeing a pulse.
///
/// An unset (or zero) frequency adopts the pulse's modulation frequency. On
/// resources sharing one NCO between all pulses, a pulse requesting another
/// frequency than the adopted one is rejected.
pub fn adopt_modulation_frequency(
    resource: &Resource,
    current: Option<f64>,
    key: &ContentKey,
    freq_mod: Option<f64>,
) -> Result<Option<f64>> {
    let Some(freq_mod) = freq_mod else {
        return Ok(current);
    };
    match current {
        Some(expected) if expected != 0.0 => {
            if resource.kind.shares_nco() && freq_mod != expected {
                return Err(Error::InconsistentModulation {
                    pulse_id: key.clone(),
                    resource: resource.name.clone(),
                    expected,
                    found: freq_mod,
                });
            }
            Ok(current)
        }
        _ => Ok(Some(freq_mod)),
    }
}
