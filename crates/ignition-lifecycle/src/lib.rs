// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle registry and orchestrator for the Ignition bootstrap framework.
//!
//! Participants register explicitly with `{kind, order, await policy}`
//! metadata into a [`LifecycleRegistry`]; freezing it yields an ordered
//! [`LifecyclePlan`] which [`run_startup`] and [`run_shutdown`] execute with
//! failure isolation and cooperative cancellation.

pub mod orchestrator;
pub mod registry;

pub use orchestrator::{ParticipantFailure, PhaseOutcome, PhaseReport, run_shutdown, run_startup};
pub use registry::{LifecyclePlan, LifecycleRegistry, ShutdownEntry, StartupEntry};
