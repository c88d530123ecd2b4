// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::EventStatus;
use crate::ticket_status::TicketStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Ticket identifier has the wrong length or contains symbols outside the alphabet.
    InvalidTicketId(String),
    /// A scanned code could not be decoded into a ticket identifier.
    MalformedCode(String),
    /// Ticket class is not part of the configured catalog.
    UnknownTicketClass {
        /// The class that was requested.
        class: String,
        /// The classes the deployment accepts.
        allowed: Vec<String>,
    },
    /// Ticket class catalog is empty or contains an invalid entry.
    InvalidTicketClass(String),
    /// Holder name is empty or invalid.
    InvalidHolderName(String),
    /// Holder contact is empty or invalid.
    InvalidHolderContact(String),
    /// Ticket price is negative.
    InvalidPrice(i64),
    /// Gate identifier is empty or invalid.
    InvalidGateId(String),
    /// Event name is empty or invalid.
    InvalidEventName(String),
    /// Event capacity must be at least one.
    InvalidCapacity(u32),
    /// Issuance quantity is outside the accepted range.
    InvalidQuantity {
        /// The requested quantity.
        quantity: u32,
        /// The largest accepted batch.
        max: u32,
    },
    /// A stored ticket status string is not recognised.
    InvalidTicketStatus(String),
    /// A stored event status string is not recognised.
    InvalidEventStatus(String),
    /// A ticket transition is not part of the lifecycle table.
    InvalidStatusTransition {
        /// The state the ticket is expected to be in.
        from: TicketStatus,
        /// The requested target state.
        to: TicketStatus,
    },
    /// An event transition is not permitted.
    InvalidEventTransition {
        /// The current event status.
        from: EventStatus,
        /// The requested event status.
        to: EventStatus,
    },
    /// The event does not currently accept ticket sales.
    EventNotSelling {
        /// The event identifier.
        event_id: i64,
        /// The event's status.
        status: EventStatus,
    },
    /// Holder fields cannot change once a ticket is scanned or cancelled.
    HolderLocked {
        /// The ticket's status.
        status: TicketStatus,
    },
    /// A stored timestamp could not be parsed or formatted.
    InvalidTimestamp(String),
    /// The entropy source for identifier generation is unavailable.
    GenerationUnavailable(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTicketId(msg) => write!(f, "Invalid ticket id: {msg}"),
            Self::MalformedCode(msg) => write!(f, "Malformed ticket code: {msg}"),
            Self::UnknownTicketClass { class, allowed } => write!(
                f,
                "Unknown ticket class '{class}'. Allowed classes: {}",
                allowed.join(", ")
            ),
            Self::InvalidTicketClass(msg) => write!(f, "Invalid ticket class: {msg}"),
            Self::InvalidHolderName(msg) => write!(f, "Invalid holder name: {msg}"),
            Self::InvalidHolderContact(msg) => write!(f, "Invalid holder contact: {msg}"),
            Self::InvalidPrice(price) => {
                write!(f, "Invalid price: {price}. Price cannot be negative")
            }
            Self::InvalidGateId(msg) => write!(f, "Invalid gate id: {msg}"),
            Self::InvalidEventName(msg) => write!(f, "Invalid event name: {msg}"),
            Self::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {capacity}. Capacity must be at least 1")
            }
            Self::InvalidQuantity { quantity, max } => write!(
                f,
                "Invalid quantity: {quantity}. Quantity must be between 1 and {max}"
            ),
            Self::InvalidTicketStatus(status) => write!(f, "Invalid ticket status: {status}"),
            Self::InvalidEventStatus(status) => write!(f, "Invalid event status: {status}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Invalid ticket transition from {from} to {to}")
            }
            Self::InvalidEventTransition { from, to } => {
                write!(f, "Invalid event transition from {from} to {to}")
            }
            Self::EventNotSelling { event_id, status } => {
                write!(f, "Event {event_id} is {status} and does not accept ticket sales")
            }
            Self::HolderLocked { status } => {
                write!(f, "Holder details cannot change on a {status} ticket")
            }
            Self::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {msg}"),
            Self::GenerationUnavailable(msg) => {
                write!(f, "Identifier generation unavailable: {msg}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
