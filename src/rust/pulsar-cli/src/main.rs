// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Compile a pulse schedule into Q1 sequencer configurations.
//!
//! Usage: `pulsar-compile <schedule.json> [--out-dir DIR] [--debug]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pulsar_backend::waveform_sampler::StandardWaveforms;
use pulsar_backend::{CompilerSettings, generate_sequencer_configs};
use pulsar_cli::{load_schedule, write_sequencer_configs};

#[derive(Parser, Debug)]
#[command(name = "pulsar-compile")]
#[command(about = "Compile a pulse schedule into Q1 sequencer configurations")]
struct Args {
    /// Path to the schedule JSON file
    schedule: PathBuf,

    /// Output directory for the sequencer configurations
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Also write the program listings as `<resource>_sequencer.q1asm`
    #[arg(long)]
    debug: bool,

    /// Do not annotate instructions with comments
    #[arg(long)]
    no_comments: bool,

    /// Do not check the waveform count against the sequencer memory
    #[arg(long)]
    no_bank_limit: bool,

    /// Log compilation statistics
    #[arg(long)]
    diagnostics: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    pulsar_log::init_logging(args.diagnostics);

    let schedule = load_schedule(&args.schedule)?;
    let settings = CompilerSettings {
        emit_comments: !args.no_comments,
        enforce_bank_capacity: !args.no_bank_limit,
        ..Default::default()
    };
    let configs = generate_sequencer_configs(&schedule, &StandardWaveforms, settings)
        .with_context(|| format!("Failed to compile schedule '{}'", schedule.name))?;
    let written = write_sequencer_configs(&configs, &args.out_dir, args.debug)?;
    if written.is_empty() {
        pulsar_log::warn!("Schedule '{}' does not play any pulses", schedule.name);
    }
    println!("{}", serde_json::to_string_pretty(&written)?);
    Ok(())
}
