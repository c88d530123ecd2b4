// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk ticket issuance.
//!
//! A batch reserves its whole quantity against the event's capacity with
//! one atomic increment-and-check before any ticket exists. Tickets are then
//! created one at a time, each with a fresh identifier; an identifier
//! collision is retried with a new one. If the batch cannot finish, every
//! ticket it created (or may have created, after a timeout) is discarded and
//! the reservation is returned.

use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::repository::{CreateOutcome, ReserveOutcome, TicketRepository};
use admit_domain::{
    DomainError, EntropySource, Event, OsEntropy, Ticket, TicketId, TicketIdGenerator, TicketStatus,
    TicketTemplate, validate_holder, validate_quantity,
};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// A request to issue `quantity` identical tickets for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceBatch {
    pub event_id: i64,
    pub quantity: u32,
    pub template: TicketTemplate,
}

/// Issues batches of tickets.
pub struct IssuanceCoordinator<E = OsEntropy> {
    repository: Arc<dyn TicketRepository>,
    generator: TicketIdGenerator<E>,
    config: EngineConfig,
}

impl<E: EntropySource> IssuanceCoordinator<E> {
    #[must_use]
    pub fn new(
        repository: Arc<dyn TicketRepository>,
        generator: TicketIdGenerator<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            generator,
            config,
        }
    }

    /// Issues a batch and returns its tickets in creation order.
    ///
    /// All tickets start in the configured initial status.
    ///
    /// # Errors
    ///
    /// * `CoreError::DomainViolation` for an invalid quantity or holder, or
    ///   an event that is not on sale.
    /// * `CoreError::EventNotFound` if the event does not exist.
    /// * `CoreError::CapacityExceeded` if the batch does not fit; nothing is
    ///   created and the counter is unchanged.
    /// * `CoreError::IssuanceFailed` if a ticket could not get a free
    ///   identifier; the batch is rolled back.
    /// * `CoreError::GenerationUnavailable`, `CoreError::Timeout` or
    ///   `CoreError::Repository` on infrastructure failure; the batch is
    ///   rolled back.
    pub async fn issue(
        &self,
        batch: &IssuanceBatch,
        deadline: Deadline,
    ) -> Result<Vec<Ticket>, CoreError> {
        validate_quantity(batch.quantity, self.config.max_batch_size)?;
        validate_holder(&batch.template.holder)?;

        let event: Event = deadline
            .run("get_event", self.repository.get_event(batch.event_id))
            .await?
            .ok_or(CoreError::EventNotFound(batch.event_id))?;
        event.ensure_selling()?;

        self.reserve(batch, deadline).await?;

        let status: TicketStatus = self.config.initial_status();
        let purchased_at: OffsetDateTime = OffsetDateTime::now_utc();
        let mut created: Vec<Ticket> = Vec::new();
        let mut uncertain: Vec<TicketId> = Vec::new();

        for _ in 0..batch.quantity {
            match self
                .create_one(batch, status, purchased_at, deadline, &mut uncertain)
                .await
            {
                Ok(ticket) => created.push(ticket),
                Err(failure) => {
                    warn!(
                        event_id = batch.event_id,
                        created = created.len(),
                        error = %failure,
                        "Issuance batch failed, rolling back"
                    );
                    self.roll_back(batch, &created, &uncertain).await;
                    return Err(failure);
                }
            }
        }

        info!(
            event_id = batch.event_id,
            quantity = batch.quantity,
            class = %batch.template.class,
            status = %status,
            "Issued ticket batch"
        );
        Ok(created)
    }

    async fn reserve(&self, batch: &IssuanceBatch, deadline: Deadline) -> Result<(), CoreError> {
        let outcome = deadline
            .run(
                "reserve_capacity",
                self.repository
                    .reserve_capacity(batch.event_id, batch.quantity),
            )
            .await?;
        match outcome {
            ReserveOutcome::Reserved { issued } => {
                debug!(event_id = batch.event_id, issued, "Capacity reserved");
                Ok(())
            }
            ReserveOutcome::CapacityExceeded { capacity, issued } => {
                let remaining: u32 = capacity.saturating_sub(issued);
                warn!(
                    event_id = batch.event_id,
                    requested = batch.quantity,
                    remaining,
                    "Issuance refused: capacity exceeded"
                );
                Err(CoreError::CapacityExceeded {
                    event_id: batch.event_id,
                    requested: batch.quantity,
                    remaining,
                })
            }
            ReserveOutcome::NotSelling { status } => {
                warn!(
                    event_id = batch.event_id,
                    %status,
                    "Issuance refused: event left sale before reservation"
                );
                Err(CoreError::DomainViolation(DomainError::EventNotSelling {
                    event_id: batch.event_id,
                    status,
                }))
            }
            ReserveOutcome::EventNotFound => Err(CoreError::EventNotFound(batch.event_id)),
        }
    }

    /// Creates one ticket, retrying identifier collisions.
    ///
    /// An identifier whose create call failed without a definite answer is
    /// pushed to `uncertain` so the rollback can remove it.
    async fn create_one(
        &self,
        batch: &IssuanceBatch,
        status: TicketStatus,
        purchased_at: OffsetDateTime,
        deadline: Deadline,
        uncertain: &mut Vec<TicketId>,
    ) -> Result<Ticket, CoreError> {
        let attempts: u32 = self.config.identifier_attempts();
        for attempt in 1..=attempts {
            let ticket_id: TicketId = self.generator.generate().map_err(CoreError::from_domain)?;
            let ticket: Ticket = Ticket::issue(
                ticket_id,
                batch.event_id,
                &batch.template,
                status,
                purchased_at,
            );

            match deadline
                .run("create_ticket", self.repository.create_ticket(&ticket))
                .await
            {
                Ok(CreateOutcome::Created) => {
                    debug!(ticket_id = %ticket.ticket_id, attempt, "Ticket created");
                    return Ok(ticket);
                }
                Ok(CreateOutcome::DuplicateIdentifier) => {
                    warn!(
                        ticket_id = %ticket.ticket_id,
                        attempt,
                        "Identifier collision, retrying"
                    );
                }
                Err(err) => {
                    uncertain.push(ticket.ticket_id);
                    return Err(err);
                }
            }
        }

        Err(CoreError::IssuanceFailed {
            reason: format!("no free identifier after {attempts} attempts"),
        })
    }

    /// Undoes a failed batch under a fresh deadline.
    ///
    /// The reservation is returned only once every ticket is known to be
    /// gone; otherwise it stays in place and the event undersells.
    async fn roll_back(&self, batch: &IssuanceBatch, created: &[Ticket], uncertain: &[TicketId]) {
        let deadline: Deadline = Deadline::after(self.config.rollback_timeout);
        let mut clean: bool = true;

        let ids = created.iter().map(|t| &t.ticket_id).chain(uncertain.iter());
        for ticket_id in ids {
            if let Err(err) = deadline
                .run("discard_ticket", self.repository.discard_ticket(ticket_id))
                .await
            {
                error!(
                    ticket_id = %ticket_id,
                    error = %err,
                    "Failed to discard ticket during rollback"
                );
                clean = false;
            }
        }

        if !clean {
            error!(
                event_id = batch.event_id,
                quantity = batch.quantity,
                "Rollback incomplete, capacity reservation kept"
            );
            return;
        }

        match deadline
            .run(
                "release_capacity",
                self.repository
                    .release_capacity(batch.event_id, batch.quantity),
            )
            .await
        {
            Ok(()) => info!(
                event_id = batch.event_id,
                quantity = batch.quantity,
                discarded = created.len() + uncertain.len(),
                "Issuance batch rolled back"
            ),
            Err(err) => error!(
                event_id = batch.event_id,
                quantity = batch.quantity,
                error = %err,
                "Failed to release capacity during rollback"
            ),
        }
    }
}
