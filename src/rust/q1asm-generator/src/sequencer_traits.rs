// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use crate::Samples;

/// Sequencer specific traits for Q1 assembly generation
#[derive(Debug)]
pub struct SequencerTraits {
    /// Largest value an immediate duration operand can hold.
    pub immediate_max: Samples,
    /// Shortest duration (in clock cycles) a timed instruction may carry.
    pub min_duration: Samples,
    pub sample_path_width: u64,
    pub clock_mhz: u64,
    pub nco_lut_depth: u64,
    /// Full scale output voltage, gains are normalized against it.
    pub output_volt: f64,
    /// Number of waveform memory slots per bank (one slot per I or Q path).
    pub waveform_index_capacity: u32,
}

impl SequencerTraits {
    /// Number of phase ticks in a full turn.
    pub const fn ph_incr_max(&self) -> u64 {
        self.sample_path_width * self.clock_mhz * 1_000_000
    }

    pub const fn ph_incr_coarse_factor(&self) -> u64 {
        self.ph_incr_max() / self.nco_lut_depth
    }

    pub const fn ph_incr_fine_factor(&self) -> u64 {
        self.ph_incr_coarse_factor() / self.nco_lut_depth
    }
}

pub const PULSAR_QCM_TRAITS: SequencerTraits = SequencerTraits {
    immediate_max: 65535,
    min_duration: 4,
    sample_path_width: 4,
    clock_mhz: 250,
    nco_lut_depth: 400,
    output_volt: 2.5,
    waveform_index_capacity: 1024,
};

pub const PULSAR_QRM_TRAITS: SequencerTraits = SequencerTraits {
    immediate_max: 65535,
    min_duration: 4,
    sample_path_width: 4,
    clock_mhz: 250,
    nco_lut_depth: 400,
    output_volt: 2.5,
    waveform_index_capacity: 1024,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_factors() {
        let traits = &PULSAR_QCM_TRAITS;
        assert_eq!(traits.ph_incr_max(), 1_000_000_000);
        assert_eq!(traits.ph_incr_coarse_factor(), 2_500_000);
        assert_eq!(traits.ph_incr_fine_factor(), 6_250);
    }
}
