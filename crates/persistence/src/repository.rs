// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::{
    CapacityOutcome, CompareAndSet, CreateOutcome, RepositoryError, ReserveOutcome, StatusChange,
    StatusTransitionRecord, TicketRepository,
};
use admit_domain::{Event, EventStatus, HolderInfo, NewEvent, Ticket, TicketId, TicketStatus};
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::error;

use crate::{Persistence, PersistenceError};

/// [`TicketRepository`] backed by a [`Persistence`] connection.
///
/// Clones share one connection. Separate instances opened on the same file
/// coordinate through `SQLite` locking.
///
/// Statements run on the blocking pool, so a caller's deadline stays in
/// force while `SQLite` waits on a lock held elsewhere. A call abandoned at
/// its deadline keeps the connection until the statement finishes.
#[derive(Debug, Clone)]
pub struct SqliteTicketRepository {
    persistence: Arc<Mutex<Persistence>>,
}

impl SqliteTicketRepository {
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    async fn with_persistence<T, F>(&self, call: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Persistence) -> Result<T, PersistenceError> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard: OwnedMutexGuard<Persistence> =
            Arc::clone(&self.persistence).lock_owned().await;
        let joined = tokio::task::spawn_blocking(move || call(&mut *guard)).await;
        match joined {
            Ok(result) => Ok(result?),
            Err(err) => {
                error!(error = %err, "Storage task did not complete");
                Err(RepositoryError::Storage(format!("storage task failed: {err}")))
            }
        }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn create_ticket(&self, ticket: &Ticket) -> Result<CreateOutcome, RepositoryError> {
        let ticket: Ticket = ticket.clone();
        self.with_persistence(move |p| p.create_ticket(&ticket)).await
    }

    async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, RepositoryError> {
        let ticket_id: TicketId = ticket_id.clone();
        self.with_persistence(move |p| p.get_ticket(&ticket_id)).await
    }

    async fn compare_and_set_status(
        &self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        let ticket_id: TicketId = ticket_id.clone();
        let change: StatusChange = change.clone();
        self.with_persistence(move |p| p.compare_and_set_status(&ticket_id, expected, &change))
            .await
    }

    async fn reserve_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        self.with_persistence(move |p| p.reserve_capacity(event_id, quantity))
            .await
    }

    async fn release_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        self.with_persistence(move |p| p.release_capacity(event_id, quantity))
            .await
    }

    async fn discard_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError> {
        let ticket_id: TicketId = ticket_id.clone();
        self.with_persistence(move |p| p.discard_ticket(&ticket_id)).await
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, RepositoryError> {
        self.with_persistence(move |p| p.get_event(event_id)).await
    }

    async fn create_event(
        &self,
        event: &NewEvent,
        created_at: OffsetDateTime,
    ) -> Result<Event, RepositoryError> {
        let event: NewEvent = event.clone();
        self.with_persistence(move |p| p.create_event(&event, created_at))
            .await
    }

    async fn compare_and_set_event_status(
        &self,
        event_id: i64,
        expected: EventStatus,
        target: EventStatus,
    ) -> Result<CompareAndSet<Event>, RepositoryError> {
        self.with_persistence(move |p| p.compare_and_set_event_status(event_id, expected, target))
            .await
    }

    async fn set_event_capacity(
        &self,
        event_id: i64,
        capacity: u32,
    ) -> Result<CapacityOutcome, RepositoryError> {
        self.with_persistence(move |p| p.set_event_capacity(event_id, capacity))
            .await
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepositoryError> {
        self.with_persistence(Persistence::list_events).await
    }

    async fn list_tickets(&self, event_id: i64) -> Result<Vec<Ticket>, RepositoryError> {
        self.with_persistence(move |p| p.list_tickets(event_id)).await
    }

    async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        let ticket_id: TicketId = ticket_id.clone();
        let holder: HolderInfo = holder.clone();
        self.with_persistence(move |p| p.update_holder(&ticket_id, &holder))
            .await
    }

    async fn ticket_history(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, RepositoryError> {
        let ticket_id: TicketId = ticket_id.clone();
        self.with_persistence(move |p| p.ticket_history(&ticket_id)).await
    }
}
