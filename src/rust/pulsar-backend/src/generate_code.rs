// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use pulsar_log::{diagnostic, warn};
use rayon::prelude::*;

use crate::CompilerSettings;
use crate::Result;
use crate::Samples;
use crate::ir::Schedule;
use crate::program_generator::generate_program;
use crate::result::{SequencerConfig, build_sequencer_config};
use crate::schedule_compiler::{CompiledResource, compile_schedule};
use crate::waveform_sampler::WaveformRegistry;

fn generate_config(
    compiled: &CompiledResource,
    sequence_duration: Samples,
    settings: &CompilerSettings,
) -> Result<SequencerConfig> {
    let program = generate_program(compiled, sequence_duration, settings)?;
    Ok(build_sequencer_config(compiled, &program))
}

/// Compile a schedule into one sequencer configuration per used resource.
///
/// Resources appear in schedule order; resources without pulses are omitted.
/// The first error aborts the whole compilation.
pub fn generate_sequencer_configs(
    schedule: &Schedule,
    registry: &dyn WaveformRegistry,
    mut settings: CompilerSettings,
) -> Result<IndexMap<String, SequencerConfig>> {
    for msg in settings.sanitize()? {
        warn!(
            "Compiler setting `{}` is sanitized from '{}' to '{}'. Reason: {}",
            msg.field.to_uppercase(),
            msg.original,
            msg.sanitized,
            msg.reason
        );
    }
    let compiled = compile_schedule(schedule, registry, &settings)?;
    diagnostic!(
        "Schedule '{}': {} resources, sequence duration {} samples, {} acquisitions",
        schedule.name,
        compiled.resources.len(),
        compiled.sequence_duration,
        compiled.acquisitions.len()
    );
    let resources: Vec<(&String, &CompiledResource)> = compiled.resources.iter().collect();
    let configs = resources
        .par_iter()
        .map(|(name, resource)| -> Result<(String, SequencerConfig)> {
            let config = generate_config(resource, compiled.sequence_duration, &settings)?;
            Ok((name.to_string(), config))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(configs.into_iter().collect())
}
