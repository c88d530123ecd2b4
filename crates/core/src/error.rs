// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::repository::RepositoryError;
use admit_domain::{DomainError, EventStatus, TicketId, TicketStatus};
use thiserror::Error;

/// Errors returned by engine operations.
///
/// Stale reads, repeated scans and rejected scans are not errors; they are
/// reported through the operation's outcome type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    #[error("Event {0} not found")]
    EventNotFound(i64),
    #[error("Ticket {0} not found")]
    TicketNotFound(TicketId),
    /// The batch does not fit in the event's remaining capacity.
    #[error(
        "Event {event_id} cannot issue {requested} tickets: only {remaining} remaining"
    )]
    CapacityExceeded {
        event_id: i64,
        requested: u32,
        remaining: u32,
    },
    /// Capacity cannot change once tickets exist.
    #[error("Capacity of event {event_id} is locked: {issued} tickets already issued")]
    CapacityLocked { event_id: i64, issued: u32 },
    /// The ticket is in a state the requested change cannot leave.
    #[error("Ticket {ticket_id} is {actual} and cannot become {target}")]
    InvalidTransition {
        ticket_id: TicketId,
        actual: TicketStatus,
        target: TicketStatus,
    },
    #[error("Event {event_id} is {actual} and cannot become {target}")]
    InvalidEventTransition {
        event_id: i64,
        actual: EventStatus,
        target: EventStatus,
    },
    /// The batch failed and was rolled back.
    #[error("Issuance failed: {reason}")]
    IssuanceFailed { reason: String },
    /// No secure randomness is available.
    #[error("Identifier generation unavailable: {0}")]
    GenerationUnavailable(String),
    /// The deadline passed. The operation may or may not have taken effect.
    #[error("Operation '{operation}' timed out")]
    Timeout { operation: &'static str },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CoreError {
    /// Converts a domain error, keeping entropy failures distinct from
    /// rule violations.
    #[must_use]
    pub fn from_domain(err: DomainError) -> Self {
        match err {
            DomainError::GenerationUnavailable(msg) => Self::GenerationUnavailable(msg),
            other => Self::DomainViolation(other),
        }
    }
}
