// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One waveform emission request of an operation.
///
/// All times are in seconds; `t0` is relative to the start of the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseDescription {
    #[serde(default)]
    pub channel: Option<String>,
    pub t0: f64,
    pub duration: f64,
    #[serde(default)]
    pub wf_func: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amp: Option<f64>,
    #[serde(default, rename = "G_amp", skip_serializing_if = "Option::is_none")]
    pub g_amp: Option<f64>,
    #[serde(default, rename = "D_amp", skip_serializing_if = "Option::is_none")]
    pub d_amp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    /// Modulation frequency in Hz, applied by the sequencer NCO.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq_mod: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr_sigma: Option<f64>,
    /// Any further numeric waveform parameters.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl PulseDescription {
    pub fn new(channel: Option<&str>, t0: f64, duration: f64) -> Self {
        PulseDescription {
            channel: channel.map(|c| c.to_string()),
            t0,
            duration,
            wf_func: None,
            amp: None,
            g_amp: None,
            d_amp: None,
            phase: None,
            freq_mod: None,
            nr_sigma: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn square(channel: &str, t0: f64, duration: f64, amp: f64) -> Self {
        PulseDescription {
            wf_func: Some("square".to_string()),
            amp: Some(amp),
            ..Self::new(Some(channel), t0, duration)
        }
    }

    pub fn soft_square(channel: &str, t0: f64, duration: f64, amp: f64) -> Self {
        PulseDescription {
            wf_func: Some("soft_square".to_string()),
            amp: Some(amp),
            ..Self::new(Some(channel), t0, duration)
        }
    }

    pub fn drag(
        channel: &str,
        t0: f64,
        duration: f64,
        g_amp: f64,
        d_amp: f64,
        phase: f64,
    ) -> Self {
        PulseDescription {
            wf_func: Some("drag".to_string()),
            g_amp: Some(g_amp),
            d_amp: Some(d_amp),
            phase: Some(phase),
            nr_sigma: Some(3.0),
            ..Self::new(Some(channel), t0, duration)
        }
    }

    pub fn with_freq_mod(mut self, freq_mod: f64) -> Self {
        self.freq_mod = Some(freq_mod);
        self
    }

    /// Numeric waveform parameters by name, excluding timing.
    pub fn numeric_params(&self) -> BTreeMap<&str, f64> {
        let named = [
            ("amp", self.amp),
            ("G_amp", self.g_amp),
            ("D_amp", self.d_amp),
            ("phase", self.phase),
            ("freq_mod", self.freq_mod),
            ("nr_sigma", self.nr_sigma),
        ];
        named
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), *v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pulse() {
        let json = r#"{
            "channel": "qcm0",
            "t0": 1e-8,
            "duration": 2e-8,
            "wf_func": "drag",
            "G_amp": 0.5,
            "D_amp": 0.1,
            "phase": 90.0,
            "sigma_scale": 2.0
        }"#;
        let pulse: PulseDescription = serde_json::from_str(json).unwrap();
        assert_eq!(pulse.channel.as_deref(), Some("qcm0"));
        assert_eq!(pulse.g_amp, Some(0.5));
        assert_eq!(pulse.d_amp, Some(0.1));
        assert_eq!(pulse.amp, None);
        assert_eq!(pulse.extra.get("sigma_scale"), Some(&2.0));
    }

    #[test]
    fn test_numeric_params() {
        let pulse = PulseDescription::square("ch", 0.0, 1e-7, 0.4).with_freq_mod(10e6);
        let params = pulse.numeric_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["amp"], 0.4);
        assert_eq!(params["freq_mod"], 10e6);
    }

    #[test]
    fn test_marker_pulse_defaults() {
        let json = r#"{"t0": 0.0, "duration": 1e-8}"#;
        let pulse: PulseDescription = serde_json::from_str(json).unwrap();
        assert_eq!(pulse, PulseDescription::new(None, 0.0, 1e-8));
    }
}
