// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::identifier::{TicketId, qr_payload};
use crate::ticket_status::TicketStatus;
use crate::types::{GateId, HolderInfo, Price, TicketClass};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where and when a ticket was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Time of admission.
    #[serde(with = "time::serde::rfc3339")]
    pub scanned_at: OffsetDateTime,
    /// Gate that admitted the ticket.
    pub gate_id: GateId,
}

/// One admission right, bound to one event.
///
/// `scan` is present exactly when `status` is [`TicketStatus::Scanned`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub event_id: i64,
    pub holder: HolderInfo,
    pub class: TicketClass,
    pub price: Price,
    pub status: TicketStatus,
    pub qr_payload: String,
    pub scan: Option<ScanRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub purchased_at: OffsetDateTime,
    pub design_ref: Option<String>,
}

impl Ticket {
    /// Builds a ticket ready to be stored.
    ///
    /// The QR payload is derived from the identifier and event.
    #[must_use]
    pub fn issue(
        ticket_id: TicketId,
        event_id: i64,
        template: &TicketTemplate,
        status: TicketStatus,
        purchased_at: OffsetDateTime,
    ) -> Self {
        let qr_payload: String = qr_payload(event_id, &ticket_id);
        Self {
            ticket_id,
            event_id,
            holder: template.holder.clone(),
            class: template.class.clone(),
            price: template.price,
            status,
            qr_payload,
            scan: None,
            purchased_at,
            design_ref: template.design_ref.clone(),
        }
    }

    /// Returns whether the scan metadata agrees with the status.
    #[must_use]
    pub const fn scan_metadata_consistent(&self) -> bool {
        matches!(
            (self.status, &self.scan),
            (TicketStatus::Scanned, Some(_))
                | (
                    TicketStatus::Pending | TicketStatus::Valid | TicketStatus::Cancelled,
                    None
                )
        )
    }
}

/// Per-ticket attributes shared by every ticket of an issuance batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTemplate {
    pub class: TicketClass,
    pub price: Price,
    pub holder: HolderInfo,
    /// Reference to an external ticket design, passed through untouched.
    pub design_ref: Option<String>,
}
