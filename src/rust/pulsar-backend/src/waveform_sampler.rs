// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Numeric evaluation of waveform functions.

use std::f64::consts::PI;
use std::str::FromStr;

use num_complex::Complex64;
use numeric_array::NumericArray;

use crate::ir::PulseDescription;
use crate::utils::length_to_samples;
use crate::{Error, Result};

/// Waveform functions with known register normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformFunction {
    Square,
    SoftSquare,
    Drag,
}

impl FromStr for WaveformFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "square" => Ok(WaveformFunction::Square),
            "soft_square" => Ok(WaveformFunction::SoftSquare),
            "drag" => Ok(WaveformFunction::Drag),
            _ => Err(Error::UnsupportedWaveform {
                wf_func: s.to_string(),
            }),
        }
    }
}

/// A lookup from waveform function identifiers to sampled waveforms.
///
/// Implementations must be referentially transparent: the same identifier,
/// parameters and sample times always yield the same samples.
pub trait WaveformRegistry {
    fn sample(&self, wf_func: &str, t: &[f64], pulse: &PulseDescription) -> Result<NumericArray>;
}

/// Sample times `0, 1/rate, 2/rate, ...` covering `duration`.
pub fn sample_times(duration: f64, sampling_rate: f64) -> Vec<f64> {
    let count = length_to_samples(duration, sampling_rate).max(0);
    (0..count).map(|i| i as f64 / sampling_rate).collect()
}

fn required(value: Option<f64>, name: &str, wf_func: &str) -> Result<f64> {
    value.ok_or_else(|| {
        Error::new(format!(
            "Waveform function '{wf_func}' requires the parameter '{name}'"
        ))
    })
}

pub fn square(t: &[f64], amp: f64) -> Vec<f64> {
    vec![amp; t.len()]
}

fn hann_window(length: usize) -> Vec<f64> {
    match length {
        0 => vec![],
        1 => vec![1.0],
        n => (0..n)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
            .collect(),
    }
}

/// Convolution returning the central part with the length of `data`.
fn convolve_same(data: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = data.len();
    let m = kernel.len();
    let offset = (m - 1) / 2;
    (0..n)
        .map(|k| {
            let full_index = k + offset;
            (0..m)
                .filter(|&j| j <= full_index && full_index - j < n)
                .map(|j| kernel[j] * data[full_index - j])
                .sum()
        })
        .collect()
}

/// A square pulse with edges smoothed by a Hann window of half its length.
///
/// Pulses too short for a window with nonzero weight stay square.
pub fn soft_square(t: &[f64], amp: f64) -> Vec<f64> {
    let data = square(t, amp);
    let window = hann_window(t.len() / 2);
    let norm: f64 = window.iter().sum();
    if norm <= 0.0 {
        return data;
    }
    convolve_same(&data, &window)
        .into_iter()
        .map(|x| x / norm)
        .collect()
}

/// Gaussian envelope on I with its derivative on Q, rotated by `phase` degrees.
///
/// The average of the first and last sample is subtracted from both
/// quadratures so the pulse starts and ends close to zero.
pub fn drag(
    t: &[f64],
    g_amp: f64,
    d_amp: f64,
    duration: f64,
    nr_sigma: f64,
    phase: f64,
) -> Vec<Complex64> {
    let (Some(&first), Some(&last)) = (t.first(), t.last()) else {
        return vec![];
    };
    let mu = first + duration / 2.0;
    let sigma = duration / (2.0 * nr_sigma);
    let gauss = |x: f64| (-0.5 * (x - mu).powi(2) / sigma.powi(2)).exp();
    let gauss_env = |x: f64| g_amp * gauss(x);
    let deriv_env = |x: f64| -d_amp * (x - mu) / sigma * gauss(x);

    let gauss_offset = (gauss_env(first) + gauss_env(last)) / 2.0;
    let deriv_offset = (deriv_env(first) + deriv_env(last)) / 2.0;
    let rotation = Complex64::from_polar(1.0, phase.to_radians());
    t.iter()
        .map(|&x| {
            Complex64::new(gauss_env(x) - gauss_offset, deriv_env(x) - deriv_offset) * rotation
        })
        .collect()
}

/// Built-in waveform functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWaveforms;

impl WaveformRegistry for StandardWaveforms {
    fn sample(&self, wf_func: &str, t: &[f64], pulse: &PulseDescription) -> Result<NumericArray> {
        let samples = match wf_func.parse::<WaveformFunction>()? {
            WaveformFunction::Square => {
                NumericArray::from(square(t, required(pulse.amp, "amp", wf_func)?))
            }
            WaveformFunction::SoftSquare => {
                NumericArray::from(soft_square(t, required(pulse.amp, "amp", wf_func)?))
            }
            WaveformFunction::Drag => NumericArray::from(drag(
                t,
                required(pulse.g_amp, "G_amp", wf_func)?,
                required(pulse.d_amp, "D_amp", wf_func)?,
                pulse.duration,
                pulse.nr_sigma.unwrap_or(3.0),
                pulse.phase.unwrap_or(0.0),
            )),
        };
        Ok(samples)
    }
}
