// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::repository::{CapacityOutcome, CompareAndSet, TicketRepository};
use admit_domain::{Event, EventStatus, NewEvent, validate_capacity};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Organizer operations on events.
#[derive(Clone)]
pub struct EventAdministrator {
    repository: Arc<dyn TicketRepository>,
}

impl EventAdministrator {
    #[must_use]
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// Creates an event in `Draft`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DomainViolation` for an empty name or zero
    /// capacity.
    pub async fn create(
        &self,
        name: &str,
        capacity: u32,
        deadline: Deadline,
    ) -> Result<Event, CoreError> {
        let new_event: NewEvent = NewEvent::new(name, capacity)?;
        let event: Event = deadline
            .run(
                "create_event",
                self.repository
                    .create_event(&new_event, OffsetDateTime::now_utc()),
            )
            .await?;
        info!(
            event_id = event.event_id,
            name = %event.name,
            capacity = event.capacity,
            "Event created"
        );
        Ok(event)
    }

    /// Moves an event forward to `target`.
    ///
    /// Requesting the status the event already has succeeds without change.
    ///
    /// # Errors
    ///
    /// * `CoreError::EventNotFound` if the event does not exist.
    /// * `CoreError::InvalidEventTransition` if the event cannot reach
    ///   `target` from its current status.
    pub async fn transition(
        &self,
        event_id: i64,
        target: EventStatus,
        deadline: Deadline,
    ) -> Result<Event, CoreError> {
        let mut current: Event = self.get(event_id, deadline).await?;
        loop {
            if current.status == target {
                return Ok(current);
            }
            if !current.status.can_transition_to(target) {
                warn!(
                    event_id,
                    from = %current.status,
                    to = %target,
                    "Event transition refused"
                );
                return Err(CoreError::InvalidEventTransition {
                    event_id,
                    actual: current.status,
                    target,
                });
            }

            let result = deadline
                .run(
                    "compare_and_set_event_status",
                    self.repository
                        .compare_and_set_event_status(event_id, current.status, target),
                )
                .await?;
            match result {
                CompareAndSet::Applied(event) => {
                    info!(
                        event_id,
                        from = %current.status,
                        to = %target,
                        "Event status changed"
                    );
                    return Ok(event);
                }
                CompareAndSet::Stale(actual) => current = actual,
                CompareAndSet::NotFound => return Err(CoreError::EventNotFound(event_id)),
            }
        }
    }

    /// Changes capacity of an event that has no tickets yet.
    ///
    /// # Errors
    ///
    /// * `CoreError::DomainViolation` for a zero capacity.
    /// * `CoreError::CapacityLocked` once any ticket has been issued.
    /// * `CoreError::EventNotFound` if the event does not exist.
    pub async fn set_capacity(
        &self,
        event_id: i64,
        capacity: u32,
        deadline: Deadline,
    ) -> Result<Event, CoreError> {
        validate_capacity(capacity)?;
        let outcome = deadline
            .run(
                "set_event_capacity",
                self.repository.set_event_capacity(event_id, capacity),
            )
            .await?;
        match outcome {
            CapacityOutcome::Updated(event) => {
                info!(event_id, capacity, "Event capacity changed");
                Ok(event)
            }
            CapacityOutcome::Locked(event) => {
                warn!(event_id, issued = event.issued, "Event capacity is locked");
                Err(CoreError::CapacityLocked {
                    event_id,
                    issued: event.issued,
                })
            }
            CapacityOutcome::EventNotFound => Err(CoreError::EventNotFound(event_id)),
        }
    }

    /// # Errors
    ///
    /// Returns `CoreError::EventNotFound` if the event does not exist.
    pub async fn get(&self, event_id: i64, deadline: Deadline) -> Result<Event, CoreError> {
        deadline
            .run("get_event", self.repository.get_event(event_id))
            .await?
            .ok_or(CoreError::EventNotFound(event_id))
    }

    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list(&self, deadline: Deadline) -> Result<Vec<Event>, CoreError> {
        deadline
            .run("list_events", self.repository.list_events())
            .await
    }
}
