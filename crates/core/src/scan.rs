// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Gate-side validation of presented codes.
//!
//! Admission is a compare-and-set from `Valid` to `Scanned`, so of any number
//! of concurrent scans of one ticket exactly one is admitted and the rest see
//! the original scan.

use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::lifecycle::{LifecycleManager, TransitionOutcome};
use crate::repository::{RepositoryError, StatusChange, TicketRepository};
use admit_domain::{
    Event, EventStatus, GateId, ScanCode, ScanRecord, Ticket, TicketId, TicketStatus,
    decode_scan_code,
};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Why a known ticket was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    Cancelled,
    /// Still pending confirmation.
    NotConfirmed,
    /// The code names a different event than the ticket belongs to.
    EventMismatch,
}

impl RejectionReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::NotConfirmed => "not_confirmed",
            Self::EventMismatch => "event_mismatch",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the gate should do with a presented code.
///
/// Every variant is a successful validation; only infrastructure failures
/// are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Let the holder in. The ticket is now `Scanned`.
    Admitted { ticket: Ticket },
    /// The ticket was admitted before; carries that first admission.
    AlreadyScanned {
        ticket_id: TicketId,
        scanned_at: OffsetDateTime,
        gate_id: GateId,
    },
    Rejected {
        ticket_id: TicketId,
        reason: RejectionReason,
    },
    NotFound { ticket_id: TicketId },
    MalformedCode { reason: String },
    /// The ticket's event is not admitting.
    EventNotActive {
        ticket_id: TicketId,
        event_id: i64,
        status: EventStatus,
    },
}

impl ValidationOutcome {
    /// Short machine-readable name of the outcome.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Admitted { .. } => "admitted",
            Self::AlreadyScanned { .. } => "already_scanned",
            Self::Rejected { .. } => "rejected",
            Self::NotFound { .. } => "not_found",
            Self::MalformedCode { .. } => "malformed_code",
            Self::EventNotActive { .. } => "event_not_active",
        }
    }
}

/// Validates scans at the gate.
#[derive(Clone)]
pub struct ScanValidator {
    repository: Arc<dyn TicketRepository>,
    lifecycle: LifecycleManager,
}

impl ScanValidator {
    #[must_use]
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self {
            lifecycle: LifecycleManager::new(Arc::clone(&repository)),
            repository,
        }
    }

    /// Decodes `code` and, if the ticket is admissible, admits it at `gate`.
    ///
    /// Re-validating the same code is safe: the second call reports
    /// `AlreadyScanned` with the first admission's time and gate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Timeout` or `CoreError::Repository` if storage
    /// fails, and `CoreError::EventNotFound` if the ticket refers to an
    /// event that no longer exists.
    pub async fn validate(
        &self,
        code: &str,
        gate: &GateId,
        deadline: Deadline,
    ) -> Result<ValidationOutcome, CoreError> {
        let outcome = self.evaluate(code, gate, deadline).await?;
        match &outcome {
            ValidationOutcome::Admitted { ticket } => {
                info!(ticket_id = %ticket.ticket_id, gate = %gate, "Ticket admitted");
            }
            other => {
                warn!(gate = %gate, outcome = other.kind(), "Scan not admitted");
            }
        }
        Ok(outcome)
    }

    async fn evaluate(
        &self,
        code: &str,
        gate: &GateId,
        deadline: Deadline,
    ) -> Result<ValidationOutcome, CoreError> {
        let scan_code: ScanCode = match decode_scan_code(code) {
            Ok(decoded) => decoded,
            Err(err) => {
                return Ok(ValidationOutcome::MalformedCode {
                    reason: err.to_string(),
                });
            }
        };
        let ticket_id: TicketId = scan_code.ticket_id;

        let Some(ticket) = deadline
            .run("get_ticket", self.repository.get_ticket(&ticket_id))
            .await?
        else {
            return Ok(ValidationOutcome::NotFound { ticket_id });
        };

        if scan_code.event_id.is_some_and(|id| id != ticket.event_id) {
            return Ok(ValidationOutcome::Rejected {
                ticket_id,
                reason: RejectionReason::EventMismatch,
            });
        }

        let event: Event = deadline
            .run("get_event", self.repository.get_event(ticket.event_id))
            .await?
            .ok_or(CoreError::EventNotFound(ticket.event_id))?;
        if !event.status.admits_entry() {
            return Ok(ValidationOutcome::EventNotActive {
                ticket_id,
                event_id: event.event_id,
                status: event.status,
            });
        }

        let change = StatusChange::admit(ScanRecord {
            scanned_at: OffsetDateTime::now_utc(),
            gate_id: gate.clone(),
        });
        let result = self
            .lifecycle
            .transition(&ticket_id, TicketStatus::Valid, &change, deadline)
            .await;

        match result {
            Ok(TransitionOutcome::Applied(ticket)) => Ok(ValidationOutcome::Admitted { ticket }),
            Ok(TransitionOutcome::StaleState { actual }) => Self::classify_stale(actual),
            Err(CoreError::TicketNotFound(_)) => Ok(ValidationOutcome::NotFound { ticket_id }),
            Err(err) => Err(err),
        }
    }

    fn classify_stale(actual: Ticket) -> Result<ValidationOutcome, CoreError> {
        match (actual.status, actual.scan) {
            (TicketStatus::Scanned, Some(scan)) => Ok(ValidationOutcome::AlreadyScanned {
                ticket_id: actual.ticket_id,
                scanned_at: scan.scanned_at,
                gate_id: scan.gate_id,
            }),
            (TicketStatus::Cancelled, _) => Ok(ValidationOutcome::Rejected {
                ticket_id: actual.ticket_id,
                reason: RejectionReason::Cancelled,
            }),
            (TicketStatus::Pending, _) => Ok(ValidationOutcome::Rejected {
                ticket_id: actual.ticket_id,
                reason: RejectionReason::NotConfirmed,
            }),
            (status, _) => Err(CoreError::Repository(RepositoryError::InvalidData(format!(
                "ticket {} reported stale while {status} without scan record",
                actual.ticket_id
            )))),
        }
    }
}
