// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps travel as RFC 3339 strings and statuses as their lowercase
//! names.

use admit::{StatusTransitionRecord, ValidationOutcome};
use admit_domain::{Event, Ticket};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// API request to create an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    /// Maximum number of tickets the event may ever issue.
    pub capacity: u32,
}

/// API request to move an event to another status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEventRequest {
    /// One of `draft`, `selling`, `active`, `closed`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCapacityRequest {
    pub capacity: u32,
}

/// API view of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    pub event_id: i64,
    pub name: String,
    pub capacity: u32,
    pub issued: u32,
    /// Tickets that can still be issued.
    pub remaining: u32,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            remaining: event.capacity.saturating_sub(event.issued),
            event_id: event.event_id,
            name: event.name,
            capacity: event.capacity,
            issued: event.issued,
            status: event.status.as_str().to_string(),
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEventsResponse {
    pub events: Vec<EventResponse>,
}

/// API request to issue a batch of tickets for one event.
///
/// Every ticket of the batch shares these attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTicketsRequest {
    pub quantity: u32,
    /// Class name, matched case-insensitively against the catalog.
    pub ticket_class: String,
    /// Price in minor currency units.
    pub price_minor: i64,
    pub holder_name: String,
    pub holder_contact: String,
    #[serde(default)]
    pub design_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTicketsResponse {
    pub event_id: i64,
    /// Identifiers in issuance order.
    pub ticket_ids: Vec<String>,
    pub tickets: Vec<TicketResponse>,
}

/// API view of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub ticket_id: String,
    pub event_id: i64,
    pub holder_name: String,
    pub holder_contact: String,
    pub ticket_class: String,
    pub price_minor: i64,
    pub status: String,
    pub qr_payload: String,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub scanned_at: Option<OffsetDateTime>,
    pub gate_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub purchased_at: OffsetDateTime,
    pub design_ref: Option<String>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        let (scanned_at, gate_id) = ticket.scan.map_or((None, None), |scan| {
            (Some(scan.scanned_at), Some(scan.gate_id.as_str().to_string()))
        });
        Self {
            ticket_id: ticket.ticket_id.as_str().to_string(),
            event_id: ticket.event_id,
            holder_name: ticket.holder.name,
            holder_contact: ticket.holder.contact,
            ticket_class: ticket.class.as_str().to_string(),
            price_minor: ticket.price.minor_units(),
            status: ticket.status.as_str().to_string(),
            qr_payload: ticket.qr_payload,
            scanned_at,
            gate_id,
            purchased_at: ticket.purchased_at,
            design_ref: ticket.design_ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    pub event_id: i64,
    pub tickets: Vec<TicketResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmTicketResponse {
    pub ticket: TicketResponse,
    /// True when the ticket had been confirmed by an earlier request.
    pub already_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTicketResponse {
    pub ticket: TicketResponse,
    /// True when the ticket had been cancelled by an earlier request.
    pub already_cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHolderRequest {
    pub holder_name: String,
    pub holder_contact: String,
}

/// One entry of a ticket's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResponse {
    /// Absent for the creation entry.
    pub from_status: Option<String>,
    pub to_status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub gate_id: Option<String>,
}

impl From<StatusTransitionRecord> for TransitionResponse {
    fn from(record: StatusTransitionRecord) -> Self {
        Self {
            from_status: record.from.map(|s| s.as_str().to_string()),
            to_status: record.to.as_str().to_string(),
            at: record.at,
            gate_id: record.gate_id.map(|g| g.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketHistoryResponse {
    pub ticket_id: String,
    pub transitions: Vec<TransitionResponse>,
}

/// API request to validate a scanned code at a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateScanRequest {
    /// The QR payload or a bare ticket identifier.
    pub code: String,
    pub gate_id: String,
}

/// Result of a scan.
///
/// `outcome` is one of `admitted`, `already_scanned`, `rejected`,
/// `not_found`, `malformed_code`, `event_not_active`. Only `admitted` lets
/// the holder in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateScanResponse {
    pub outcome: String,
    pub admit: bool,
    pub ticket_id: Option<String>,
    pub reason: Option<String>,
    /// For repeats, when and where the ticket was first admitted.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub scanned_at: Option<OffsetDateTime>,
    pub gate_id: Option<String>,
    pub event_id: Option<i64>,
    pub event_status: Option<String>,
    pub ticket: Option<TicketResponse>,
}

impl ValidateScanResponse {
    fn empty(outcome: &ValidationOutcome) -> Self {
        Self {
            outcome: outcome.kind().to_string(),
            admit: false,
            ticket_id: None,
            reason: None,
            scanned_at: None,
            gate_id: None,
            event_id: None,
            event_status: None,
            ticket: None,
        }
    }
}

impl From<ValidationOutcome> for ValidateScanResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        let base: Self = Self::empty(&outcome);
        match outcome {
            ValidationOutcome::Admitted { ticket } => {
                let ticket: TicketResponse = ticket.into();
                Self {
                    admit: true,
                    ticket_id: Some(ticket.ticket_id.clone()),
                    scanned_at: ticket.scanned_at,
                    gate_id: ticket.gate_id.clone(),
                    event_id: Some(ticket.event_id),
                    ticket: Some(ticket),
                    ..base
                }
            }
            ValidationOutcome::AlreadyScanned {
                ticket_id,
                scanned_at,
                gate_id,
            } => Self {
                ticket_id: Some(ticket_id.as_str().to_string()),
                scanned_at: Some(scanned_at),
                gate_id: Some(gate_id.as_str().to_string()),
                ..base
            },
            ValidationOutcome::Rejected { ticket_id, reason } => Self {
                ticket_id: Some(ticket_id.as_str().to_string()),
                reason: Some(reason.as_str().to_string()),
                ..base
            },
            ValidationOutcome::NotFound { ticket_id } => Self {
                ticket_id: Some(ticket_id.as_str().to_string()),
                ..base
            },
            ValidationOutcome::MalformedCode { reason } => Self {
                reason: Some(reason),
                ..base
            },
            ValidationOutcome::EventNotActive {
                ticket_id,
                event_id,
                status,
            } => Self {
                ticket_id: Some(ticket_id.as_str().to_string()),
                event_id: Some(event_id),
                event_status: Some(status.as_str().to_string()),
                ..base
            },
        }
    }
}
