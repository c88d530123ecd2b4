// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod deadline;
mod engine;
mod error;
mod events;
mod issuance;
mod lifecycle;
mod memory;
mod repository;
mod scan;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_IDENTIFIER_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT,
    EngineConfig,
};
pub use deadline::Deadline;
pub use engine::TicketEngine;
pub use error::CoreError;
pub use events::EventAdministrator;
pub use issuance::{IssuanceBatch, IssuanceCoordinator};
pub use lifecycle::{CancelOutcome, ConfirmOutcome, LifecycleManager, TransitionOutcome};
pub use memory::InMemoryTicketRepository;
pub use repository::{
    CapacityOutcome, CompareAndSet, CreateOutcome, RepositoryError, ReserveOutcome,
    StatusChange, StatusTransitionRecord, TicketRepository,
};
pub use scan::{RejectionReason, ScanValidator, ValidationOutcome};
