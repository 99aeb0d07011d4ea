// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use crate::ir::pulse::PulseDescription;
use crate::ir::schedule::{
    Operation, OperationId, Resource, ResourceKind, Schedule, TimingConstraint,
};

/// Incrementally assemble a [`Schedule`].
pub struct ScheduleBuilder {
    schedule: Schedule,
}

impl ScheduleBuilder {
    pub fn new(name: &str) -> Self {
        ScheduleBuilder {
            schedule: Schedule::new(name),
        }
    }

    pub fn resource(mut self, name: &str, kind: ResourceKind, sampling_rate: f64) -> Self {
        self.schedule
            .resources
            .insert(name.to_string(), Resource::new(name, kind, sampling_rate));
        self
    }

    pub fn resource_with(mut self, resource: Resource) -> Self {
        self.schedule
            .resources
            .insert(resource.name.clone(), resource);
        self
    }

    /// Register an operation under its own name.
    pub fn operation(mut self, name: &str, pulses: Vec<PulseDescription>) -> Self {
        self.schedule.operations.insert(
            name.to_string(),
            Operation {
                name: name.to_string(),
                pulse_info: pulses,
            },
        );
        self
    }

    pub fn at(mut self, operation: &str, abs_time: Option<f64>) -> Self {
        self.schedule.timing_constraints.push(TimingConstraint {
            operation_hash: OperationId::from(operation),
            abs_time,
        });
        self
    }

    /// Shortcut for a single pulse operation placed at `abs_time`.
    pub fn pulse(self, name: &str, pulse: PulseDescription, abs_time: f64) -> Self {
        self.operation(name, vec![pulse]).at(name, Some(abs_time))
    }

    pub fn build(self) -> Schedule {
        self.schedule
    }
}
