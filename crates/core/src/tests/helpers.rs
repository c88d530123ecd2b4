// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CapacityOutcome, CompareAndSet, CreateOutcome, EngineConfig, InMemoryTicketRepository,
    RepositoryError, ReserveOutcome, StatusChange, StatusTransitionRecord, TicketEngine,
    TicketRepository,
};
use admit_domain::{
    EntropySource, Event, EventStatus, HolderInfo, NewEvent, Price, Ticket, TicketClassCatalog,
    TicketId, TicketIdGenerator, TicketStatus, TicketTemplate,
};
use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::OffsetDateTime;

pub fn create_test_holder() -> HolderInfo {
    HolderInfo::new("Ada Lovelace", "ada@example.com")
}

pub fn create_test_template() -> TicketTemplate {
    TicketTemplate {
        class: TicketClassCatalog::default().resolve("general").unwrap(),
        price: Price::new(2500).unwrap(),
        holder: create_test_holder(),
        design_ref: Some(String::from("poster-a")),
    }
}

/// Stores an event directly and moves it to `status` along legal steps.
pub async fn seed_event(
    repository: &dyn TicketRepository,
    capacity: u32,
    status: EventStatus,
) -> Event {
    let new_event = NewEvent::new("Spring Gala", capacity).unwrap();
    let mut event = repository
        .create_event(&new_event, OffsetDateTime::now_utc())
        .await
        .unwrap();
    let path: &[EventStatus] = match status {
        EventStatus::Draft => &[],
        EventStatus::Selling => &[EventStatus::Selling],
        EventStatus::Active => &[EventStatus::Selling, EventStatus::Active],
        EventStatus::Closed => &[EventStatus::Closed],
    };
    for &next in path {
        match repository
            .compare_and_set_event_status(event.event_id, event.status, next)
            .await
            .unwrap()
        {
            CompareAndSet::Applied(updated) => event = updated,
            other => panic!("failed to seed event status: {other:?}"),
        }
    }
    event
}

/// An engine over a fresh in-memory repository.
pub fn create_test_engine(config: EngineConfig) -> (Arc<InMemoryTicketRepository>, TicketEngine) {
    let repository = Arc::new(InMemoryTicketRepository::new());
    let engine = TicketEngine::new(repository.clone(), config);
    (repository, engine)
}

/// Fills every byte of each identifier with the next scripted value, then
/// repeats the last one. Identical values produce identical identifiers.
pub struct ScriptedEntropy {
    script: Mutex<(VecDeque<u8>, u8)>,
}

impl ScriptedEntropy {
    pub fn new(values: &[u8]) -> Self {
        Self {
            script: Mutex::new((values.iter().copied().collect(), 0)),
        }
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        let mut script = self.script.lock().unwrap();
        if let Some(next) = script.0.pop_front() {
            script.1 = next;
        }
        dest.fill(script.1);
        Ok(())
    }
}

/// Succeeds `remaining` times, then reports the source unavailable.
pub struct ExhaustingEntropy {
    remaining: AtomicUsize,
}

impl ExhaustingEntropy {
    pub const fn new(successes: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(successes),
        }
    }
}

impl EntropySource for ExhaustingEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left == 0 {
            return Err(String::from("entropy pool closed"));
        }
        self.remaining.store(left - 1, Ordering::SeqCst);
        dest.iter_mut()
            .enumerate()
            .for_each(|(i, b)| *b = u8::try_from(i + left).unwrap_or(0));
        Ok(())
    }
}

pub fn scripted_engine(
    repository: Arc<dyn TicketRepository>,
    values: &[u8],
    config: EngineConfig,
) -> TicketEngine<ScriptedEntropy> {
    TicketEngine::with_generator(
        repository,
        TicketIdGenerator::with_entropy(ScriptedEntropy::new(values)),
        config,
    )
}

/// The identifier [`ScriptedEntropy`] produces for `value`.
pub fn scripted_id(value: u8) -> TicketId {
    TicketIdGenerator::with_entropy(ScriptedEntropy::new(&[value]))
        .generate()
        .unwrap()
}

/// Wraps the in-memory repository with injectable faults and scheduling
/// jitter.
#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryTicketRepository,
    create_calls: AtomicUsize,
    fail_create_from: Option<usize>,
    stall_create_from: Option<(usize, Duration)>,
    fail_discards: AtomicBool,
    close_before_reserve: bool,
    cancel_before_status_change: bool,
    discard_before_status_change: bool,
    jitter: bool,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create calls from index `n` (zero-based) return a storage error.
    pub fn failing_create_from(mut self, n: usize) -> Self {
        self.fail_create_from = Some(n);
        self
    }

    /// Create calls from index `n` write the ticket and then hang.
    pub fn stalling_create_from(mut self, n: usize, stall: Duration) -> Self {
        self.stall_create_from = Some((n, stall));
        self
    }

    pub fn failing_discards(self) -> Self {
        self.fail_discards.store(true, Ordering::SeqCst);
        self
    }

    /// Closes the event just before each reservation reaches storage.
    pub fn closing_event_before_reserve(mut self) -> Self {
        self.close_before_reserve = true;
        self
    }

    /// Cancels the ticket just before each status change reaches storage.
    pub fn cancelling_before_status_change(mut self) -> Self {
        self.cancel_before_status_change = true;
        self
    }

    /// Deletes the ticket just before each status change reaches storage.
    pub fn discarding_before_status_change(mut self) -> Self {
        self.discard_before_status_change = true;
        self
    }

    /// Yields a random number of times before every call.
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    async fn maybe_yield(&self) {
        if self.jitter {
            let spins: usize = rand::rng().random_range(0..4);
            for _ in 0..spins {
                tokio::task::yield_now().await;
            }
        }
    }
}

#[async_trait]
impl TicketRepository for FlakyRepository {
    async fn create_ticket(&self, ticket: &Ticket) -> Result<CreateOutcome, RepositoryError> {
        self.maybe_yield().await;
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_from.is_some_and(|n| call >= n) {
            return Err(RepositoryError::Storage(String::from("disk full")));
        }
        let outcome = self.inner.create_ticket(ticket).await?;
        if let Some((n, stall)) = self.stall_create_from {
            if call >= n {
                tokio::time::sleep(stall).await;
            }
        }
        Ok(outcome)
    }

    async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, RepositoryError> {
        self.maybe_yield().await;
        self.inner.get_ticket(ticket_id).await
    }

    async fn compare_and_set_status(
        &self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        self.maybe_yield().await;
        if self.cancel_before_status_change {
            self.inner
                .compare_and_set_status(
                    ticket_id,
                    expected,
                    &StatusChange::cancel(OffsetDateTime::now_utc()),
                )
                .await?;
        }
        if self.discard_before_status_change {
            self.inner.discard_ticket(ticket_id).await?;
        }
        self.inner
            .compare_and_set_status(ticket_id, expected, change)
            .await
    }

    async fn reserve_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        self.maybe_yield().await;
        if self.close_before_reserve {
            if let Some(event) = self.inner.get_event(event_id).await? {
                self.inner
                    .compare_and_set_event_status(event_id, event.status, EventStatus::Closed)
                    .await?;
            }
        }
        self.inner.reserve_capacity(event_id, quantity).await
    }

    async fn release_capacity(
        &self,
        event_id: i64,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        self.maybe_yield().await;
        self.inner.release_capacity(event_id, quantity).await
    }

    async fn discard_ticket(&self, ticket_id: &TicketId) -> Result<(), RepositoryError> {
        self.maybe_yield().await;
        if self.fail_discards.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(String::from("connection reset")));
        }
        self.inner.discard_ticket(ticket_id).await
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, RepositoryError> {
        self.maybe_yield().await;
        self.inner.get_event(event_id).await
    }

    async fn create_event(
        &self,
        event: &NewEvent,
        created_at: OffsetDateTime,
    ) -> Result<Event, RepositoryError> {
        self.inner.create_event(event, created_at).await
    }

    async fn compare_and_set_event_status(
        &self,
        event_id: i64,
        expected: EventStatus,
        target: EventStatus,
    ) -> Result<CompareAndSet<Event>, RepositoryError> {
        self.maybe_yield().await;
        self.inner
            .compare_and_set_event_status(event_id, expected, target)
            .await
    }

    async fn set_event_capacity(
        &self,
        event_id: i64,
        capacity: u32,
    ) -> Result<CapacityOutcome, RepositoryError> {
        self.inner.set_event_capacity(event_id, capacity).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepositoryError> {
        self.inner.list_events().await
    }

    async fn list_tickets(&self, event_id: i64) -> Result<Vec<Ticket>, RepositoryError> {
        self.inner.list_tickets(event_id).await
    }

    async fn update_holder(
        &self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<CompareAndSet<Ticket>, RepositoryError> {
        self.maybe_yield().await;
        self.inner.update_holder(ticket_id, holder).await
    }

    async fn ticket_history(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, RepositoryError> {
        self.inner.ticket_history(ticket_id).await
    }
}
