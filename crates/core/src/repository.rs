// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage contract the engine depends on.
//!
//! Implementations must make every method atomic on its own. The engine
//! never reads a value, changes it in memory and writes it back; the
//! per-ticket status and the per-event issued counter are changed only
//! through the conditional operations declared here, so the guarantees hold
//! across processes sharing the same store.

use admit_domain::{
    Event, EventStatus, GateId, HolderInfo, NewEvent, ScanRecord, Ticket, TicketId,
    TicketStatus,
};
use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

/// Unexpected storage failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The store could not be reached or the statement failed.
    #[error("storage failure: {0}")]
    Storage(String),
    /// The store returned a row the domain cannot represent.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

/// Result of inserting a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// Another ticket already holds this identifier; nothing was written.
    DuplicateIdentifier,
}

/// Result of a compare-and-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareAndSet<T> {
    /// The expected value matched and the change was written. Carries the
    /// record as stored after the change.
    Applied(T),
    /// The expected value did not match. Carries the record as found.
    Stale(T),
    /// No record with that key exists.
    NotFound,
}

/// Result of an atomic increment-and-check on an event's issued counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The counter was increased; `issued` is the new value.
    Reserved { issued: u32 },
    /// The increase would exceed capacity; the counter is unchanged.
    CapacityExceeded { capacity: u32, issued: u32 },
    /// The event's status does not allow issuance; the counter is unchanged.
    NotSelling { status: EventStatus },
    EventNotFound,
}

/// Result of changing an event's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityOutcome {
    Updated(Event),
    /// Tickets were already issued, so capacity is frozen.
    Locked(Event),
    EventNotFound,
}

/// A status change to apply together with its metadata.
///
/// Constructors keep scan metadata present exactly for admissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    target: TicketStatus,
    scan: Option<ScanRecord>,
    at: OffsetDateTime,
}

impl StatusChange {
    /// Pending → Valid.
    #[must_use]
    pub const fn confirm(at: OffsetDateTime) -> Self {
        Self {
            target: TicketStatus::Valid,
            scan: None,
            at,
        }
    }

    /// Pending or Valid → Cancelled.
    #[must_use]
    pub const fn cancel(at: OffsetDateTime) -> Self {
        Self {
            target: TicketStatus::Cancelled,
            scan: None,
            at,
        }
    }

    /// Valid → Scanned, recording where and when.
    #[must_use]
    pub const fn admit(scan: ScanRecord) -> Self {
        let at: OffsetDateTime = scan.scanned_at;
        Self {
            target: TicketStatus::Scanned,
            scan: Some(scan),
            at,
        }
    }

    #[must_use]
    pub const fn target(&self) -> TicketStatus {
        self.target
    }

    #[must_use]
    pub const fn scan(&self) -> Option<&ScanRecord> {
        self.scan.as_ref()
    }

    /// When the change happened.
    #[must_use]
    pub const fn at(&self) -> OffsetDateTime {
        self.at
    }
}

/// One applied status change, as kept in a ticket's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransitionRecord {
    pub ticket_id: TicketId,
    /// `None` for the record written when the ticket was created.
    pub from: Option<TicketStatus>,
    pub to: TicketStatus,
    pub at: OffsetDateTime,
    pub gate_id: Option<GateId>,
}

/// Durable ticket and event storage.
///
/// Every method is a single atomic step from the caller's point of view.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Inserts a ticket and its creation history record.
    ///
    /// Returns `DuplicateIdentifier` without writing anything if the
    /// identifier is taken.
    async fn create_ticket(&self, ticket: &Ticket) -> Result<CreateOutcome, RepositoryError>;

    async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, RepositoryError>;

    /// Applies `change` only if the ticket's status equals `expected`, and
    /// records the transition in the same step.
    async fn compare_and_set_status(
        &self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError>;

    /// Adds `quantity` to the event's issued counter only if the event is on
    /// sale and the result stays within capacity. Status and counter are
    /// checked in the same atomic step.
    async fn reserve_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<ReserveOutcome, RepositoryError>;

    /// Returns a reservation made by [`reserve_capacity`](Self::reserve_capacity).
    async fn release_capacity(&self, event_id: i64, quantity: u32)
    -> Result<(), RepositoryError>;

    /// Physically removes a ticket from a failed issuance batch.
    ///
    /// Removing an identifier that does not exist succeeds.
    async fn discard_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError>;

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, RepositoryError>;

    /// Stores a new event in `Draft` with nothing issued.
    async fn create_event(
        &self,
        event: &NewEvent,
        created_at: OffsetDateTime,
    ) -> Result<Event, RepositoryError>;

    async fn compare_and_set_event_status(
        &self,
        event_id: i64,
        expected: EventStatus,
        target: EventStatus,
    ) -> Result<CompareAndSet<Event>, RepositoryError>;

    /// Changes capacity only while nothing has been issued.
    async fn set_event_capacity(
        &self,
        event_id: i64,
        capacity: u32,
    ) -> Result<CapacityOutcome, RepositoryError>;

    async fn list_events(&self) -> Result<Vec<Event>, RepositoryError>;

    /// Tickets of one event in creation order.
    async fn list_tickets(&self, event_id: i64) -> Result<Vec<Ticket>, RepositoryError>;

    /// Replaces holder details only while the status allows it.
    ///
    /// `Stale` carries the ticket when its status is terminal.
    async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError>;

    /// Applied transitions of one ticket, oldest first.
    async fn ticket_history(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, RepositoryError>;
}
