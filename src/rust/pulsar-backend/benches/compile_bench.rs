// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pulsar_backend::ir::builders::ScheduleBuilder;
use pulsar_backend::ir::{PulseDescription, ResourceKind, Schedule};
use pulsar_backend::waveform_sampler::StandardWaveforms;
use pulsar_backend::{CompilerSettings, generate_sequencer_configs};
use std::hint::black_box;

/// Interleaved drag and readout pulses on `channels` control resources.
fn create_schedule(pulses: usize, channels: usize) -> Schedule {
    let mut builder = ScheduleBuilder::new("bench").resource("r0", ResourceKind::Acq, 1e9);
    for channel in 0..channels {
        builder = builder.resource(&format!("q{channel}"), ResourceKind::Awg, 1e9);
    }
    for i in 0..pulses {
        let start = i as f64 * 200e-9;
        let channel = format!("q{}", i % channels);
        // A handful of distinct amplitudes, all sharing one sampled waveform
        let amp = 0.1 + (i % 8) as f64 * 0.1;
        builder = builder
            .pulse(
                &format!("x{i}"),
                PulseDescription::drag(&channel, 0.0, 40e-9, amp, amp / 4.0, 90.0),
                start,
            )
            .pulse(
                &format!("ro{i}"),
                PulseDescription::square("r0", 0.0, 100e-9, 0.3),
                start + 40e-9,
            )
            .pulse(
                &format!("acq{i}"),
                PulseDescription::new(Some("r0_READOUT"), 0.0, 40e-9),
                start + 140e-9,
            );
    }
    builder.build()
}

fn bench_compile(c: &mut Criterion) {
    let sizes = [100, 1000, 10000];

    let mut group = c.benchmark_group("compile");

    for &size in &sizes {
        let schedule = create_schedule(size, 4);
        group.bench_with_input(BenchmarkId::new("pulses", size), &size, |b, &_size| {
            b.iter(|| {
                black_box(
                    generate_sequencer_configs(
                        &schedule,
                        &StandardWaveforms,
                        CompilerSettings::default(),
                    )
                    .unwrap(),
                );
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
