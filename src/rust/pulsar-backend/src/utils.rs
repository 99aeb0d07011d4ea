// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use crate::Samples;

/// Map `-0.0` onto `0.0` so that equal values serialize identically.
pub(crate) fn normalize_f64(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

pub(crate) fn length_to_samples(t: f64, sampling_rate: f64) -> Samples {
    (t * sampling_rate).round() as Samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_samples() {
        assert_eq!(length_to_samples(0.0, 1e9), 0);
        assert_eq!(length_to_samples(100e-9, 1e9), 100);
        assert_eq!(length_to_samples(200e-6, 1e9), 200000);
        assert_eq!(length_to_samples(12e-9, 2.4e9), 29);
        assert_eq!(length_to_samples(-4e-9, 1e9), -4);
    }

    #[test]
    fn test_normalize_f64() {
        assert_eq!(normalize_f64(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(normalize_f64(1.5), 1.5);
    }
}
