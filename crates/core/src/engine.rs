// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::EngineConfig;
use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::events::EventAdministrator;
use crate::issuance::{IssuanceBatch, IssuanceCoordinator};
use crate::lifecycle::{CancelOutcome, ConfirmOutcome, LifecycleManager};
use crate::repository::{StatusTransitionRecord, TicketRepository};
use crate::scan::{ScanValidator, ValidationOutcome};
use admit_domain::{
    EntropySource, Event, EventStatus, GateId, HolderInfo, OsEntropy, Ticket, TicketId,
    TicketIdGenerator,
};
use std::sync::Arc;

/// The ticketing engine.
///
/// Owns no mutable state of its own; everything shared between requests
/// lives in the repository. Each call gets a deadline of
/// [`EngineConfig::request_timeout`].
pub struct TicketEngine<E = OsEntropy> {
    config: EngineConfig,
    repository: Arc<dyn TicketRepository>,
    lifecycle: LifecycleManager,
    issuance: IssuanceCoordinator<E>,
    scans: ScanValidator,
    events: EventAdministrator,
}

impl TicketEngine<OsEntropy> {
    /// Creates an engine drawing identifiers from the operating system.
    #[must_use]
    pub fn new(repository: Arc<dyn TicketRepository>, config: EngineConfig) -> Self {
        Self::with_generator(repository, TicketIdGenerator::new(), config)
    }
}

impl<E: EntropySource> TicketEngine<E> {
    #[must_use]
    pub fn with_generator(
        repository: Arc<dyn TicketRepository>,
        generator: TicketIdGenerator<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            lifecycle: LifecycleManager::new(Arc::clone(&repository)),
            issuance: IssuanceCoordinator::new(Arc::clone(&repository), generator, config.clone()),
            scans: ScanValidator::new(Arc::clone(&repository)),
            events: EventAdministrator::new(Arc::clone(&repository)),
            repository,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh deadline for one request.
    #[must_use]
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.config.request_timeout)
    }

    /// See [`IssuanceCoordinator::issue`].
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is invalid, does not fit, or fails and
    /// is rolled back.
    pub async fn issue(&self, batch: &IssuanceBatch) -> Result<Vec<Ticket>, CoreError> {
        self.issuance.issue(batch, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`LifecycleManager::confirm`].
    pub async fn confirm(&self, ticket_id: &TicketId) -> Result<ConfirmOutcome, CoreError> {
        self.lifecycle.confirm(ticket_id, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`LifecycleManager::cancel`].
    pub async fn cancel(&self, ticket_id: &TicketId) -> Result<CancelOutcome, CoreError> {
        self.lifecycle.cancel(ticket_id, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`ScanValidator::validate`].
    pub async fn validate_scan(
        &self,
        code: &str,
        gate: &GateId,
    ) -> Result<ValidationOutcome, CoreError> {
        self.scans.validate(code, gate, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`LifecycleManager::update_holder`].
    pub async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<Ticket, CoreError> {
        self.lifecycle
            .update_holder(ticket_id, holder, self.deadline())
            .await
    }

    /// # Errors
    ///
    /// Returns `CoreError::TicketNotFound` if no such ticket exists.
    pub async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Ticket, CoreError> {
        self.lifecycle.get(ticket_id, self.deadline()).await
    }

    /// Tickets of an event in creation order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if the event does not exist.
    pub async fn list_tickets(&self, event_id: i64) -> Result<Vec<Ticket>, CoreError> {
        let deadline: Deadline = self.deadline();
        self.events.get(event_id, deadline).await?;
        deadline
            .run("list_tickets", self.repository.list_tickets(event_id))
            .await
    }

    /// # Errors
    ///
    /// Returns `CoreError::TicketNotFound` if no such ticket exists.
    pub async fn ticket_history(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, CoreError> {
        self.lifecycle.history(ticket_id, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`EventAdministrator::create`].
    pub async fn create_event(&self, name: &str, capacity: u32) -> Result<Event, CoreError> {
        self.events.create(name, capacity, self.deadline()).await
    }

    /// # Errors
    ///
    /// See [`EventAdministrator::transition`].
    pub async fn transition_event(
        &self,
        event_id: i64,
        target: EventStatus,
    ) -> Result<Event, CoreError> {
        self.events
            .transition(event_id, target, self.deadline())
            .await
    }

    /// # Errors
    ///
    /// See [`EventAdministrator::set_capacity`].
    pub async fn set_event_capacity(
        &self,
        event_id: i64,
        capacity: u32,
    ) -> Result<Event, CoreError> {
        self.events
            .set_capacity(event_id, capacity, self.deadline())
            .await
    }

    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if the event does not exist.
    pub async fn get_event(&self, event_id: i64) -> Result<Event, CoreError> {
        self.events.get(event_id, self.deadline()).await
    }

    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        self.events.list(self.deadline()).await
    }
}
