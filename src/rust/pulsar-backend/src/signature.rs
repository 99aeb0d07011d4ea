// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Content addressed identity of pulses.
//!
//! A [`ContentKey`] is derived from everything that determines the sampled
//! waveform of a pulse: its channel, duration, waveform function and numeric
//! parameters. The start time is excluded, so the same pulse played at
//! different times resolves to one waveform in memory.
//!
//! The pulse is first written into a canonical JSON form (parameters sorted by
//! name, `-0.0` folded onto `0.0`) which is then hashed with SHA-1.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::ir::PulseDescription;
use crate::utils::normalize_f64;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(value: &str) -> Self {
        ContentKey(value.to_string())
    }
}

#[derive(Serialize)]
struct PulseContent<'a> {
    channel: Option<&'a str>,
    duration: f64,
    wf_func: Option<&'a str>,
    params: BTreeMap<&'a str, f64>,
}

impl<'a> From<&'a PulseDescription> for PulseContent<'a> {
    fn from(pulse: &'a PulseDescription) -> Self {
        PulseContent {
            channel: pulse.channel.as_deref(),
            duration: normalize_f64(pulse.duration),
            wf_func: pulse.wf_func.as_deref(),
            params: pulse
                .numeric_params()
                .into_iter()
                .map(|(name, value)| (name, normalize_f64(value)))
                .collect(),
        }
    }
}

/// Compute the content key of a (normalized) pulse.
pub fn content_key(pulse: &PulseDescription) -> Result<ContentKey> {
    let serialized = serde_json::to_string(&PulseContent::from(pulse))
        .map_err(|e| Error::new(format!("Failed to serialize pulse content: {e}")))?;
    let mut hasher = Sha1::new();
    hasher.update(serialized.as_bytes());
    let hash = hasher.finalize();
    Ok(ContentKey(format!("{hash:x}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_start_time() {
        let a = PulseDescription::square("q0", 0.0, 1e-7, 1.0);
        let b = PulseDescription::square("q0", 5e-7, 1e-7, 1.0);
        assert_eq!(content_key(&a).unwrap(), content_key(&b).unwrap());
    }

    #[test]
    fn test_key_depends_on_content() {
        let base = PulseDescription::square("q0", 0.0, 1e-7, 1.0);
        let key = content_key(&base).unwrap();

        let longer = PulseDescription::square("q0", 0.0, 2e-7, 1.0);
        assert_ne!(key, content_key(&longer).unwrap());

        let other_channel = PulseDescription::square("q1", 0.0, 1e-7, 1.0);
        assert_ne!(key, content_key(&other_channel).unwrap());

        let modulated = base.clone().with_freq_mod(10e6);
        assert_ne!(key, content_key(&modulated).unwrap());

        let soft = PulseDescription::soft_square("q0", 0.0, 1e-7, 1.0);
        assert_ne!(key, content_key(&soft).unwrap());
    }

    #[test]
    fn test_key_is_canonical() {
        let mut a = PulseDescription::new(Some("q0"), 0.0, 1e-7);
        a.extra.insert("beta".to_string(), 1.0);
        a.extra.insert("alpha".to_string(), -0.0);
        let mut b = PulseDescription::new(Some("q0"), 0.0, 1e-7);
        b.extra.insert("alpha".to_string(), 0.0);
        b.extra.insert("beta".to_string(), 1.0);
        assert_eq!(content_key(&a).unwrap(), content_key(&b).unwrap());
        assert_eq!(content_key(&a).unwrap().as_str().len(), 40);
    }
}
