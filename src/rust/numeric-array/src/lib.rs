// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Sampled waveform data as produced by waveform functions.
//!
//! A waveform function may return either real or complex samples. Real samples
//! are treated as having an all-zero imaginary (Q) component.

use num_complex::Complex64;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericArray {
    Float64(Vec<f64>),
    Complex64(Vec<Complex64>),
}

impl NumericArray {
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Float64(vec) => vec.len(),
            NumericArray::Complex64(vec) => vec.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NumericArray::Float64(vec) => vec.is_empty(),
            NumericArray::Complex64(vec) => vec.is_empty(),
        }
    }

    /// In-phase component of the samples.
    pub fn real(&self) -> Vec<f64> {
        match self {
            NumericArray::Float64(vec) => vec.clone(),
            NumericArray::Complex64(vec) => vec.iter().map(|x| x.re).collect(),
        }
    }

    /// Quadrature component of the samples.
    pub fn imag(&self) -> Vec<f64> {
        match self {
            NumericArray::Float64(vec) => vec![0.0; vec.len()],
            NumericArray::Complex64(vec) => vec.iter().map(|x| x.im).collect(),
        }
    }
}

impl From<Vec<f64>> for NumericArray {
    fn from(value: Vec<f64>) -> Self {
        NumericArray::Float64(value)
    }
}

impl From<Vec<Complex64>> for NumericArray {
    fn from(value: Vec<Complex64>) -> Self {
        NumericArray::Complex64(value)
    }
}
