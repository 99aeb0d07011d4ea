// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Separate hardware register settings from sampled waveform parameters.
//!
//! Amplitude and phase of the supported waveform functions are applied by the
//! sequencer registers, so the sampled waveform is computed with unit
//! amplitude and zero phase. Pulses differing only in those parameters then
//! share one waveform in memory.

use serde::Serialize;

use crate::Result;
use crate::ir::PulseDescription;
use crate::waveform_sampler::WaveformFunction;

/// Register settings extracted from a pulse, in physical units.
///
/// A field that is `None` leaves the register unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PulsarModulations {
    /// Volts.
    pub gain: Option<f64>,
    /// Volts.
    pub gain_q: Option<f64>,
    /// Normalized to full scale.
    pub offset: Option<f64>,
    /// Degrees.
    pub phase: Option<f64>,
    /// Degrees.
    pub phase_delta: Option<f64>,
}

impl PulsarModulations {
    pub fn is_empty(&self) -> bool {
        self.gain.is_none()
            && self.gain_q.is_none()
            && self.offset.is_none()
            && self.phase.is_none()
            && self.phase_delta.is_none()
    }
}

/// Split a pulse into register modulations and a normalized pulse.
///
/// The input pulse is left untouched.
pub fn normalize_pulse(pulse: &PulseDescription) -> Result<(PulsarModulations, PulseDescription)> {
    let Some(wf_func) = pulse.wf_func.as_deref() else {
        return Ok((PulsarModulations::default(), pulse.clone()));
    };
    let mut normalized = pulse.clone();
    let modulations = match wf_func.parse::<WaveformFunction>()? {
        WaveformFunction::Square | WaveformFunction::SoftSquare => {
            normalized.amp = Some(1.0);
            PulsarModulations {
                gain: pulse.amp,
                ..Default::default()
            }
        }
        WaveformFunction::Drag => {
            normalized.g_amp = Some(1.0);
            normalized.d_amp = Some(1.0);
            normalized.phase = Some(0.0);
            PulsarModulations {
                gain: pulse.g_amp,
                gain_q: pulse.d_amp,
                phase: pulse.phase,
                ..Default::default()
            }
        }
    };
    Ok((modulations, normalized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_square() {
        let pulse = PulseDescription::square("q0", 0.0, 1e-7, 0.8);
        let (modulations, normalized) = normalize_pulse(&pulse).unwrap();
        assert_eq!(
            modulations,
            PulsarModulations {
                gain: Some(0.8),
                ..Default::default()
            }
        );
        assert_eq!(normalized.amp, Some(1.0));
        // Caller's copy is not modified
        assert_eq!(pulse.amp, Some(0.8));
    }

    #[test]
    fn test_soft_square() {
        let pulse = PulseDescription::soft_square("q0", 0.0, 1e-7, -0.3);
        let (modulations, normalized) = normalize_pulse(&pulse).unwrap();
        assert_eq!(modulations.gain, Some(-0.3));
        assert_eq!(normalized.amp, Some(1.0));
    }

    #[test]
    fn test_drag() {
        let pulse = PulseDescription::drag("q0", 0.0, 2e-8, 0.5, 0.2, 90.0);
        let (modulations, normalized) = normalize_pulse(&pulse).unwrap();
        assert_eq!(
            modulations,
            PulsarModulations {
                gain: Some(0.5),
                gain_q: Some(0.2),
                phase: Some(90.0),
                ..Default::default()
            }
        );
        assert_eq!(normalized.g_amp, Some(1.0));
        assert_eq!(normalized.d_amp, Some(1.0));
        assert_eq!(normalized.phase, Some(0.0));
        assert_eq!(normalized.nr_sigma, pulse.nr_sigma);
    }

    #[test]
    fn test_marker_pulse() {
        let pulse = PulseDescription::new(Some("q0"), 0.0, 1e-7);
        let (modulations, normalized) = normalize_pulse(&pulse).unwrap();
        assert!(modulations.is_empty());
        assert_eq!(normalized, pulse);
    }

    #[test]
    fn test_unsupported_waveform() {
        let mut pulse = PulseDescription::new(Some("q0"), 0.0, 1e-7);
        pulse.wf_func = Some("chirp".to_string());
        let err = normalize_pulse(&pulse).unwrap_err();
        assert!(matches!(err, Error::UnsupportedWaveform { wf_func } if wf_func == "chirp"));
    }
}
