// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket status transitions.
//!
//! Every transition names the status the caller last saw. The manager checks
//! the pair against the lifecycle table and hands the change to the
//! repository's compare-and-set; a mismatch comes back as
//! [`TransitionOutcome::StaleState`] carrying the ticket as it really is.

use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::repository::{CompareAndSet, StatusChange, StatusTransitionRecord, TicketRepository};
use admit_domain::{DomainError, HolderInfo, Ticket, TicketId, TicketStatus, validate_holder};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Result of a single compare-and-set transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(Ticket),
    /// The ticket was not in the expected status; nothing changed.
    StaleState { actual: Ticket },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed(Ticket),
    /// The ticket was confirmed earlier.
    AlreadyConfirmed(Ticket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled(Ticket),
    /// The ticket was cancelled earlier.
    AlreadyCancelled(Ticket),
}

/// Applies lifecycle transitions through the repository.
#[derive(Clone)]
pub struct LifecycleManager {
    repository: Arc<dyn TicketRepository>,
}

impl LifecycleManager {
    #[must_use]
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// Moves a ticket from `expected` to the change's target status.
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidTransition` if `expected -> target` is not in the
    ///   lifecycle table. The repository is not called.
    /// * `CoreError::TicketNotFound` if no such ticket exists.
    /// * `CoreError::Timeout` or `CoreError::Repository` on storage failure.
    pub async fn transition(
        &self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
        deadline: Deadline,
    ) -> Result<TransitionOutcome, CoreError> {
        if let Err(refused) = expected.validate_transition(change.target()) {
            debug!(ticket_id = %ticket_id, reason = %refused, "Transition refused");
            return Err(CoreError::InvalidTransition {
                ticket_id: ticket_id.clone(),
                actual: expected,
                target: change.target(),
            });
        }

        let result = deadline
            .run(
                "compare_and_set_status",
                self.repository
                    .compare_and_set_status(ticket_id, expected, change),
            )
            .await?;

        match result {
            CompareAndSet::Applied(ticket) => {
                debug!(
                    ticket_id = %ticket_id,
                    from = %expected,
                    to = %change.target(),
                    "Ticket transition applied"
                );
                Ok(TransitionOutcome::Applied(ticket))
            }
            CompareAndSet::Stale(actual) => {
                debug!(
                    ticket_id = %ticket_id,
                    expected = %expected,
                    actual = %actual.status,
                    "Ticket transition found stale state"
                );
                Ok(TransitionOutcome::StaleState { actual })
            }
            CompareAndSet::NotFound => Err(CoreError::TicketNotFound(ticket_id.clone())),
        }
    }

    /// Confirms a pending ticket. Confirming a ticket that is already past
    /// `Pending` (other than by cancellation) succeeds without change.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` for a cancelled ticket, plus
    /// the errors of [`transition`](Self::transition).
    pub async fn confirm(
        &self,
        ticket_id: &TicketId,
        deadline: Deadline,
    ) -> Result<ConfirmOutcome, CoreError> {
        let mut current: Ticket = self.get(ticket_id, deadline).await?;
        loop {
            match current.status {
                TicketStatus::Valid | TicketStatus::Scanned => {
                    return Ok(ConfirmOutcome::AlreadyConfirmed(current));
                }
                TicketStatus::Cancelled => {
                    warn!(ticket_id = %ticket_id, "Refusing to confirm a cancelled ticket");
                    return Err(CoreError::InvalidTransition {
                        ticket_id: ticket_id.clone(),
                        actual: TicketStatus::Cancelled,
                        target: TicketStatus::Valid,
                    });
                }
                TicketStatus::Pending => {
                    let change = StatusChange::confirm(OffsetDateTime::now_utc());
                    match self
                        .transition(ticket_id, TicketStatus::Pending, &change, deadline)
                        .await?
                    {
                        TransitionOutcome::Applied(ticket) => {
                            info!(ticket_id = %ticket_id, "Ticket confirmed");
                            return Ok(ConfirmOutcome::Confirmed(ticket));
                        }
                        TransitionOutcome::StaleState { actual } => current = actual,
                    }
                }
            }
        }
    }

    /// Cancels a ticket that has not been admitted.
    ///
    /// Cancelling an already-cancelled ticket succeeds without change. The
    /// event's issued counter is not decremented.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` for a scanned ticket, plus the
    /// errors of [`transition`](Self::transition).
    pub async fn cancel(
        &self,
        ticket_id: &TicketId,
        deadline: Deadline,
    ) -> Result<CancelOutcome, CoreError> {
        let mut current: Ticket = self.get(ticket_id, deadline).await?;
        loop {
            match current.status {
                TicketStatus::Cancelled => {
                    debug!(ticket_id = %ticket_id, "Ticket already cancelled");
                    return Ok(CancelOutcome::AlreadyCancelled(current));
                }
                TicketStatus::Scanned => {
                    warn!(ticket_id = %ticket_id, "Refusing to cancel an admitted ticket");
                    return Err(CoreError::InvalidTransition {
                        ticket_id: ticket_id.clone(),
                        actual: TicketStatus::Scanned,
                        target: TicketStatus::Cancelled,
                    });
                }
                status @ (TicketStatus::Pending | TicketStatus::Valid) => {
                    let change = StatusChange::cancel(OffsetDateTime::now_utc());
                    match self.transition(ticket_id, status, &change, deadline).await? {
                        TransitionOutcome::Applied(ticket) => {
                            info!(ticket_id = %ticket_id, from = %status, "Ticket cancelled");
                            return Ok(CancelOutcome::Cancelled(ticket));
                        }
                        TransitionOutcome::StaleState { actual } => current = actual,
                    }
                }
            }
        }
    }

    /// Replaces holder details of a ticket that is not yet terminal.
    ///
    /// # Errors
    ///
    /// * `CoreError::DomainViolation` if the holder is invalid or the ticket
    ///   is scanned or cancelled.
    /// * `CoreError::TicketNotFound` if no such ticket exists.
    pub async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
        deadline: Deadline,
    ) -> Result<Ticket, CoreError> {
        validate_holder(holder)?;
        let result = deadline
            .run(
                "update_holder",
                self.repository.update_holder(ticket_id, holder),
            )
            .await?;
        match result {
            CompareAndSet::Applied(ticket) => {
                info!(ticket_id = %ticket_id, "Holder details updated");
                Ok(ticket)
            }
            CompareAndSet::Stale(actual) => {
                warn!(
                    ticket_id = %ticket_id,
                    status = %actual.status,
                    "Holder change refused"
                );
                Err(CoreError::DomainViolation(DomainError::HolderLocked {
                    status: actual.status,
                }))
            }
            CompareAndSet::NotFound => Err(CoreError::TicketNotFound(ticket_id.clone())),
        }
    }

    /// Returns the applied transitions of a ticket, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TicketNotFound` if no such ticket exists.
    pub async fn history(
        &self,
        ticket_id: &TicketId,
        deadline: Deadline,
    ) -> Result<Vec<StatusTransitionRecord>, CoreError> {
        self.get(ticket_id, deadline).await?;
        deadline
            .run("ticket_history", self.repository.ticket_history(ticket_id))
            .await
    }

    /// Loads a ticket.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::TicketNotFound` if no such ticket exists.
    pub async fn get(&self, ticket_id: &TicketId, deadline: Deadline) -> Result<Ticket, CoreError> {
        deadline
            .run("get_ticket", self.repository.get_ticket(ticket_id))
            .await?
            .ok_or_else(|| CoreError::TicketNotFound(ticket_id.clone()))
    }
}
