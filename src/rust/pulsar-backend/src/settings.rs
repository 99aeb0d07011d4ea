// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Module for defining settings for the pulsar backend.

use crate::{Error, Result};

pub const DEFAULT_ACQUISITION_SUFFIX: &str = "_READOUT";

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizationChange {
    pub field: &'static str,
    pub original: String,
    pub sanitized: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerSettings {
    /// Annotate emitted instructions with comments.
    pub emit_comments: bool,
    /// Fail when a waveform bank exceeds the sequencer memory.
    pub enforce_bank_capacity: bool,
    /// Channel name suffix marking a pulse as an acquisition.
    pub acquisition_suffix: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        CompilerSettings {
            emit_comments: true,
            enforce_bank_capacity: true,
            acquisition_suffix: DEFAULT_ACQUISITION_SUFFIX.to_string(),
        }
    }
}

impl CompilerSettings {
    pub fn new(emit_comments: bool, enforce_bank_capacity: bool, acquisition_suffix: &str) -> Self {
        CompilerSettings {
            emit_comments,
            enforce_bank_capacity,
            acquisition_suffix: acquisition_suffix.to_string(),
        }
    }

    pub fn sanitize(&mut self) -> Result<Vec<SanitizationChange>> {
        let mut changes = vec![];
        let trimmed = self.acquisition_suffix.trim();
        if trimmed.is_empty() {
            return Err(Error::new(
                "Acquisition suffix must not be empty, every channel would match it",
            ));
        }
        if trimmed != self.acquisition_suffix {
            changes.push(SanitizationChange {
                field: "acquisition_suffix",
                original: self.acquisition_suffix.clone(),
                sanitized: trimmed.to_string(),
                reason: "Surrounding whitespace removed.".to_string(),
            });
            self.acquisition_suffix = trimmed.to_string();
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let settings = CompilerSettings::default();
        assert!(settings.emit_comments);
        assert!(settings.enforce_bank_capacity);
        assert_eq!(settings.acquisition_suffix, "_READOUT");
    }

    #[test]
    fn test_sanitize_suffix() {
        let mut settings = CompilerSettings::new(true, true, " _ACQ ");
        let changes = settings.sanitize().unwrap();
        assert_eq!(settings.acquisition_suffix, "_ACQ");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "acquisition_suffix");
        assert_eq!(changes[0].original, " _ACQ ");

        let mut settings = CompilerSettings::default();
        assert!(settings.sanitize().unwrap().is_empty());
    }

    #[test]
    fn test_sanitize_rejects_empty_suffix() {
        let mut settings = CompilerSettings::new(true, true, "  ");
        assert!(settings.sanitize().is_err());

        let mut settings = CompilerSettings {
            acquisition_suffix: String::new(),
            ..Default::default()
        };
        assert!(settings.sanitize().is_err());
    }
}
