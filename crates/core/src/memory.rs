// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A process-local repository.
//!
//! Each method takes one short lock over the whole store, which makes every
//! method atomic. Used by tests and by deployments without a database.

use crate::repository::{
    CapacityOutcome, CompareAndSet, CreateOutcome, RepositoryError, ReserveOutcome,
    StatusChange, StatusTransitionRecord, TicketRepository,
};
use admit_domain::{Event, EventStatus, HolderInfo, NewEvent, Ticket, TicketId, TicketStatus};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

#[derive(Debug, Default)]
struct Store {
    events: BTreeMap<i64, Event>,
    next_event_id: i64,
    tickets: HashMap<TicketId, Ticket>,
    /// Ticket identifiers in creation order.
    order: Vec<TicketId>,
    history: HashMap<TicketId, Vec<StatusTransitionRecord>>,
}

/// In-memory [`TicketRepository`].
#[derive(Debug, Default)]
pub struct InMemoryTicketRepository {
    store: Mutex<Store>,
}

impl InMemoryTicketRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Storage(String::from("store lock poisoned")))
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create_ticket(&self, ticket: &Ticket) -> Result<CreateOutcome, RepositoryError> {
        let mut store = self.lock()?;
        if store.tickets.contains_key(&ticket.ticket_id) {
            return Ok(CreateOutcome::DuplicateIdentifier);
        }
        store
            .tickets
            .insert(ticket.ticket_id.clone(), ticket.clone());
        store.order.push(ticket.ticket_id.clone());
        store.history.insert(
            ticket.ticket_id.clone(),
            vec![StatusTransitionRecord {
                ticket_id: ticket.ticket_id.clone(),
                from: None,
                to: ticket.status,
                at: ticket.purchased_at,
                gate_id: None,
            }],
        );
        Ok(CreateOutcome::Created)
    }

    async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, RepositoryError> {
        Ok(self.lock()?.tickets.get(ticket_id).cloned())
    }

    async fn compare_and_set_status(
        &self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        let mut store = self.lock()?;
        let Some(ticket) = store.tickets.get_mut(ticket_id) else {
            return Ok(CompareAndSet::NotFound);
        };
        if ticket.status != expected {
            return Ok(CompareAndSet::Stale(ticket.clone()));
        }
        ticket.status = change.target();
        ticket.scan = change.scan().cloned();
        let updated: Ticket = ticket.clone();

        store
            .history
            .entry(ticket_id.clone())
            .or_default()
            .push(StatusTransitionRecord {
                ticket_id: ticket_id.clone(),
                from: Some(expected),
                to: change.target(),
                at: change.at(),
                gate_id: change.scan().map(|s| s.gate_id.clone()),
            });
        Ok(CompareAndSet::Applied(updated))
    }

    async fn reserve_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        let mut store = self.lock()?;
        let Some(event) = store.events.get_mut(&event_id) else {
            return Ok(ReserveOutcome::EventNotFound);
        };
        if !event.status.allows_issuance() {
            return Ok(ReserveOutcome::NotSelling {
                status: event.status,
            });
        }
        match event.issued.checked_add(quantity) {
            Some(issued) if issued <= event.capacity => {
                event.issued = issued;
                Ok(ReserveOutcome::Reserved { issued })
            }
            _ => Ok(ReserveOutcome::CapacityExceeded {
                capacity: event.capacity,
                issued: event.issued,
            }),
        }
    }

    async fn release_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        let mut store = self.lock()?;
        if let Some(event) = store.events.get_mut(&event_id) {
            event.issued = event.issued.saturating_sub(quantity);
        }
        Ok(())
    }

    async fn discard_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError> {
        let mut store = self.lock()?;
        if store.tickets.remove(ticket_id).is_some() {
            store.order.retain(|id| id != ticket_id);
            store.history.remove(ticket_id);
        }
        Ok(())
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, RepositoryError> {
        Ok(self.lock()?.events.get(&event_id).cloned())
    }

    async fn create_event(
        &self,
        event: &NewEvent,
        created_at: OffsetDateTime,
    ) -> Result<Event, RepositoryError> {
        let mut store = self.lock()?;
        store.next_event_id += 1;
        let stored = Event {
            event_id: store.next_event_id,
            name: event.name.clone(),
            capacity: event.capacity,
            issued: 0,
            status: EventStatus::Draft,
            created_at,
        };
        store.events.insert(stored.event_id, stored.clone());
        Ok(stored)
    }

    async fn compare_and_set_event_status(
        &self,
        event_id: i64,
        expected: EventStatus,
        target: EventStatus,
    ) -> Result<CompareAndSet<Event>, RepositoryError> {
        let mut store = self.lock()?;
        let Some(event) = store.events.get_mut(&event_id) else {
            return Ok(CompareAndSet::NotFound);
        };
        if event.status != expected {
            return Ok(CompareAndSet::Stale(event.clone()));
        }
        event.status = target;
        Ok(CompareAndSet::Applied(event.clone()))
    }

    async fn set_event_capacity(
        &self,
        event_id: i64,
        capacity: u32,
    ) -> Result<CapacityOutcome, RepositoryError> {
        let mut store = self.lock()?;
        let Some(event) = store.events.get_mut(&event_id) else {
            return Ok(CapacityOutcome::EventNotFound);
        };
        if event.issued > 0 {
            return Ok(CapacityOutcome::Locked(event.clone()));
        }
        event.capacity = capacity;
        Ok(CapacityOutcome::Updated(event.clone()))
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepositoryError> {
        Ok(self.lock()?.events.values().cloned().collect())
    }

    async fn list_tickets(&self, event_id: i64) -> Result<Vec<Ticket>, RepositoryError> {
        let store = self.lock()?;
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.tickets.get(id))
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        let mut store = self.lock()?;
        let Some(ticket) = store.tickets.get_mut(ticket_id) else {
            return Ok(CompareAndSet::NotFound);
        };
        if !ticket.status.allows_holder_changes() {
            return Ok(CompareAndSet::Stale(ticket.clone()));
        }
        ticket.holder = holder.clone();
        Ok(CompareAndSet::Applied(ticket.clone()))
    }

    async fn ticket_history(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, RepositoryError> {
        Ok(self
            .lock()?
            .history
            .get(ticket_id)
            .cloned()
            .unwrap_or_default())
    }
}
