// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Schedule model consumed by the compiler.

pub mod builders;
pub mod pulse;
pub mod schedule;

pub use pulse::PulseDescription;
pub use schedule::{Operation, OperationId, Resource, ResourceKind, Schedule, TimingConstraint};
