// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! File handling of the `pulsar-compile` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use pulsar_backend::ir::Schedule;
use pulsar_backend::result::SequencerConfig;
use pulsar_log::info;

pub fn load_schedule(path: &Path) -> Result<Schedule> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schedule '{}'", path.display()))
}

/// Write one `<resource>_sequencer_cfg.json` per resource into `out_dir`.
///
/// With `debug`, the program listing is also written to
/// `<resource>_sequencer.q1asm`. Returns the configuration file per resource.
pub fn write_sequencer_configs(
    configs: &IndexMap<String, SequencerConfig>,
    out_dir: &Path,
    debug: bool,
) -> Result<IndexMap<String, PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;
    let mut written = IndexMap::new();
    for (resource, config) in configs {
        let path = out_dir.join(format!("{resource}_sequencer_cfg.json"));
        let json = serde_json::to_string_pretty(config)
            .with_context(|| format!("Failed to serialize configuration of '{resource}'"))?;
        fs::write(&path, json).with_context(|| format!("Failed to write '{}'", path.display()))?;
        info!("Wrote sequencer configuration {}", path.display());
        if debug {
            let listing = out_dir.join(format!("{resource}_sequencer.q1asm"));
            fs::write(&listing, &config.program)
                .with_context(|| format!("Failed to write '{}'", listing.display()))?;
        }
        written.insert(resource.clone(), path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_backend::ir::builders::ScheduleBuilder;
    use pulsar_backend::ir::{PulseDescription, ResourceKind};
    use pulsar_backend::waveform_sampler::StandardWaveforms;
    use pulsar_backend::{CompilerSettings, generate_sequencer_configs};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pulsar-cli-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_round_trip_through_files() {
        let dir = scratch_dir("roundtrip");
        let schedule = ScheduleBuilder::new("s")
            .resource("q0", ResourceKind::Awg, 1e9)
            .pulse("a", PulseDescription::square("q0", 0.0, 20e-9, 0.5), 0.0)
            .build();
        let schedule_path = dir.join("schedule.json");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&schedule_path, serde_json::to_string(&schedule).unwrap()).unwrap();

        let loaded = load_schedule(&schedule_path).unwrap();
        assert_eq!(loaded, schedule);

        let configs =
            generate_sequencer_configs(&loaded, &StandardWaveforms, CompilerSettings::default())
                .unwrap();
        let written = write_sequencer_configs(&configs, &dir.join("out"), true).unwrap();
        assert_eq!(written["q0"], dir.join("out").join("q0_sequencer_cfg.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written["q0"]).unwrap()).unwrap();
        assert!(json["program"].as_str().unwrap().contains("play"));
        assert_eq!(json["instrument_config"]["nco_freq"], 0.0);
        let listing = fs::read_to_string(dir.join("out").join("q0_sequencer.q1asm")).unwrap();
        assert_eq!(listing, configs["q0"].program);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_schedule() {
        let err = load_schedule(Path::new("/nonexistent/schedule.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read schedule"));
    }
}
