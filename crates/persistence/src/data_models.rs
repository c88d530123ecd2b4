// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain values.
//!
//! Timestamps are stored as RFC 3339 text and statuses as their lowercase
//! names. Counts are `BIGINT` in storage and `u32` in the domain.

use admit::StatusTransitionRecord;
use admit_domain::{
    Event, EventStatus, GateId, HolderInfo, Price, ScanRecord, Ticket, TicketClass, TicketId,
    TicketStatus,
};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{events, ticket_status_history, tickets};
use crate::error::PersistenceError;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = events)]
pub struct EventRow {
    pub event_id: i64,
    pub name: String,
    pub capacity: i64,
    pub issued_count: i64,
    pub status: String,
    pub created_at: String,
}

impl EventRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidData` if a column is out of range.
    pub fn into_event(self) -> Result<Event, PersistenceError> {
        Ok(Event {
            event_id: self.event_id,
            name: self.name,
            capacity: to_count("capacity", self.capacity)?,
            issued: to_count("issued_count", self.issued_count)?,
            status: EventStatus::from_str(&self.status)
                .map_err(|e| PersistenceError::InvalidData(e.to_string()))?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEventRow {
    pub name: String,
    pub capacity: i64,
    pub issued_count: i64,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
    pub ticket_pk: i64,
    pub ticket_id: String,
    pub event_id: i64,
    pub holder_name: String,
    pub holder_contact: String,
    pub ticket_class: String,
    pub price_minor: i64,
    pub status: String,
    pub qr_payload: String,
    pub scanned_at: Option<String>,
    pub gate_id: Option<String>,
    pub purchased_at: String,
    pub design_ref: Option<String>,
}

impl TicketRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidData` if a column cannot be parsed or
    /// scan columns disagree with the status.
    pub fn into_ticket(self) -> Result<Ticket, PersistenceError> {
        let status: TicketStatus = TicketStatus::from_str(&self.status).map_err(invalid)?;
        let scan: Option<ScanRecord> = match (status, self.scanned_at, self.gate_id) {
            (TicketStatus::Scanned, Some(scanned_at), Some(gate_id)) => Some(ScanRecord {
                scanned_at: parse_timestamp(&scanned_at)?,
                gate_id: GateId::new(&gate_id).map_err(invalid)?,
            }),
            (TicketStatus::Scanned, _, _) | (_, Some(_), _) | (_, _, Some(_)) => {
                return Err(PersistenceError::InvalidData(format!(
                    "ticket {} has scan columns inconsistent with status {status}",
                    self.ticket_id
                )));
            }
            _ => None,
        };

        Ok(Ticket {
            ticket_id: TicketId::parse(&self.ticket_id).map_err(invalid)?,
            event_id: self.event_id,
            holder: HolderInfo {
                name: self.holder_name,
                contact: self.holder_contact,
            },
            class: TicketClass::from_stored(&self.ticket_class),
            price: Price::new(self.price_minor).map_err(invalid)?,
            status,
            qr_payload: self.qr_payload,
            scan,
            purchased_at: parse_timestamp(&self.purchased_at)?,
            design_ref: self.design_ref,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow {
    pub ticket_id: String,
    pub event_id: i64,
    pub holder_name: String,
    pub holder_contact: String,
    pub ticket_class: String,
    pub price_minor: i64,
    pub status: String,
    pub qr_payload: String,
    pub purchased_at: String,
    pub design_ref: Option<String>,
}

impl NewTicketRow {
    /// # Errors
    ///
    /// Returns an error if the purchase time cannot be formatted.
    pub fn from_ticket(ticket: &Ticket) -> Result<Self, PersistenceError> {
        Ok(Self {
            ticket_id: ticket.ticket_id.as_str().to_string(),
            event_id: ticket.event_id,
            holder_name: ticket.holder.name.clone(),
            holder_contact: ticket.holder.contact.clone(),
            ticket_class: ticket.class.as_str().to_string(),
            price_minor: ticket.price.minor_units(),
            status: ticket.status.as_str().to_string(),
            qr_payload: ticket.qr_payload.clone(),
            purchased_at: format_timestamp(ticket.purchased_at)?,
            design_ref: ticket.design_ref.clone(),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = ticket_status_history)]
pub struct HistoryRow {
    pub history_id: i64,
    pub ticket_id: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub transitioned_at: String,
    pub gate_id: Option<String>,
}

impl HistoryRow {
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidData` if a column cannot be parsed.
    pub fn into_record(self) -> Result<StatusTransitionRecord, PersistenceError> {
        Ok(StatusTransitionRecord {
            ticket_id: TicketId::parse(&self.ticket_id).map_err(invalid)?,
            from: self
                .from_status
                .as_deref()
                .map(TicketStatus::from_str)
                .transpose()
                .map_err(invalid)?,
            to: TicketStatus::from_str(&self.to_status).map_err(invalid)?,
            at: parse_timestamp(&self.transitioned_at)?,
            gate_id: self
                .gate_id
                .as_deref()
                .map(GateId::new)
                .transpose()
                .map_err(invalid)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = ticket_status_history)]
pub struct NewHistoryRow {
    pub ticket_id: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub transitioned_at: String,
    pub gate_id: Option<String>,
}

fn invalid(err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::InvalidData(err.to_string())
}

fn to_count(column: &str, value: i64) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::InvalidData(format!("{column} out of range: {value}"))
    })
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp has no RFC 3339 representation.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339).map_err(invalid)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidData` if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(invalid)
}
