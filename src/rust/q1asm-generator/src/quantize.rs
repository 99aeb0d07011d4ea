// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point conversion of register values.
//!
//! Gains and offsets are written as signed immediates scaled by half of the
//! immediate range. Phases are converted to a tick count over a full turn and
//! decomposed into the coarse, fine and ultra-fine stages of the NCO lookup.
//! All conversions truncate.

use serde::Serialize;

use crate::sequencer_traits::SequencerTraits;
use crate::{Error, Result, Samples};

/// Phase register operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PhaseParams {
    pub coarse: u64,
    pub fine: u64,
    pub ultrafine: u64,
}

impl PhaseParams {
    /// Tick count represented by the three stages.
    pub fn ticks(&self, traits: &SequencerTraits) -> u64 {
        self.coarse * traits.ph_incr_coarse_factor()
            + self.fine * traits.ph_incr_fine_factor()
            + self.ultrafine
    }
}

/// Convert a value in the normalized range `-1.0..=1.0` to an immediate.
pub fn expand_from_normalized_range(
    value: f64,
    parameter: &'static str,
    immediate_max: Samples,
) -> Result<i64> {
    if value.is_nan() || value.abs() > 1.0 {
        return Err(Error::OutOfRange { parameter, value });
    }
    Ok((value * immediate_max as f64 / 2.0).trunc() as i64)
}

/// Convert degrees to a tick count over a full turn.
///
/// The angle is wrapped into `[0, 360)` first.
pub fn degrees_to_ticks(degrees: f64, ph_incr_max: u64) -> u64 {
    let turns = degrees.rem_euclid(360.0) / 360.0;
    let ticks = (turns * ph_incr_max as f64).trunc() as u64;
    ticks % ph_incr_max
}

/// Decompose a tick count into coarse, fine and ultra-fine stages.
pub fn decompose_phase_ticks(ticks: u64, traits: &SequencerTraits) -> PhaseParams {
    let coarse_factor = traits.ph_incr_coarse_factor();
    let fine_factor = traits.ph_incr_fine_factor();
    let coarse = ticks / coarse_factor;
    let remainder = ticks - coarse * coarse_factor;
    let fine = remainder / fine_factor;
    let ultrafine = remainder - fine * fine_factor;
    PhaseParams {
        coarse,
        fine,
        ultrafine,
    }
}

pub fn calculate_phase_params(degrees: f64, traits: &SequencerTraits) -> PhaseParams {
    decompose_phase_ticks(degrees_to_ticks(degrees, traits.ph_incr_max()), traits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer_traits::PULSAR_QCM_TRAITS;
    use proptest::prelude::*;

    #[test]
    fn test_expand_from_normalized_range() {
        assert_eq!(expand_from_normalized_range(0.0, "Gain", 65535).unwrap(), 0);
        assert_eq!(expand_from_normalized_range(1.0, "Gain", 65535).unwrap(), 32767);
        assert_eq!(expand_from_normalized_range(-1.0, "Gain", 65535).unwrap(), -32767);
        assert_eq!(expand_from_normalized_range(0.5, "Gain", 65535).unwrap(), 16383);
        assert_eq!(expand_from_normalized_range(-0.5, "Gain", 65535).unwrap(), -16383);
    }

    #[test]
    fn test_expand_out_of_range() {
        let err = expand_from_normalized_range(1.5, "Gain", 65535).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                parameter: "Gain",
                ..
            }
        ));
        assert!(expand_from_normalized_range(-1.0001, "Offset", 65535).is_err());
        assert!(expand_from_normalized_range(f64::NAN, "Offset", 65535).is_err());
    }

    #[test]
    fn test_phase_params() {
        let traits = &PULSAR_QCM_TRAITS;
        assert_eq!(
            calculate_phase_params(0.0, traits),
            PhaseParams {
                coarse: 0,
                fine: 0,
                ultrafine: 0
            }
        );
        // 90 degrees = 250_000_000 ticks = 100 coarse steps
        assert_eq!(
            calculate_phase_params(90.0, traits),
            PhaseParams {
                coarse: 100,
                fine: 0,
                ultrafine: 0
            }
        );
        // 1 degree = 2_777_777 ticks
        assert_eq!(
            calculate_phase_params(1.0, traits),
            PhaseParams {
                coarse: 1,
                fine: 44,
                ultrafine: 2777
            }
        );
    }

    #[test]
    fn test_phase_wraps_full_turns() {
        let traits = &PULSAR_QCM_TRAITS;
        assert_eq!(
            calculate_phase_params(450.0, traits),
            calculate_phase_params(90.0, traits)
        );
        assert_eq!(
            calculate_phase_params(-90.0, traits),
            calculate_phase_params(270.0, traits)
        );
        assert_eq!(degrees_to_ticks(360.0, traits.ph_incr_max()), 0);
    }

    proptest! {
        #[test]
        fn prop_gain_quantization_bound(value in -1.0f64..=1.0) {
            let immediate = expand_from_normalized_range(value, "Gain", 65535).unwrap();
            prop_assert!((-32767..=32767).contains(&immediate));
            prop_assert!((immediate as f64 / 32767.5 - value).abs() < 2.0 / 65535.0);
        }

        #[test]
        fn prop_phase_decomposition_exact(ticks in 0u64..1_000_000_000) {
            let traits = &PULSAR_QCM_TRAITS;
            let params = decompose_phase_ticks(ticks, traits);
            prop_assert_eq!(params.ticks(traits), ticks);
            prop_assert!(params.coarse < traits.nco_lut_depth);
            prop_assert!(params.fine < traits.nco_lut_depth);
            prop_assert!(params.ultrafine < traits.ph_incr_fine_factor());
        }

        #[test]
        fn prop_phase_never_exceeds_input(degrees in 0.0f64..360.0) {
            let traits = &PULSAR_QCM_TRAITS;
            let ticks = degrees_to_ticks(degrees, traits.ph_incr_max());
            let params = calculate_phase_params(degrees, traits);
            prop_assert!(params.ticks(traits) <= ticks);
            prop_assert!(ticks as f64 <= degrees / 360.0 * traits.ph_incr_max() as f64);
        }
    }
}
