// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::{CapacityOutcome, CompareAndSet, ReserveOutcome};
use admit_domain::{Event, EventStatus, NewEvent};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewEventRow, format_timestamp};
use crate::diesel_schema::events;
use crate::error::PersistenceError;
use crate::queries::find_event;

/// Stores a new event in `Draft` with nothing issued.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    event: &NewEvent,
    created_at: OffsetDateTime,
) -> Result<Event, PersistenceError> {
    let row = NewEventRow {
        name: event.name.clone(),
        capacity: i64::from(event.capacity),
        issued_count: 0,
        status: EventStatus::Draft.as_str().to_string(),
        created_at: format_timestamp(created_at)?,
    };

    conn.immediate_transaction(|conn| {
        diesel::insert_into(events::table)
            .values(&row)
            .execute(conn)?;
        let event_id: i64 = get_last_insert_rowid(conn)?;
        info!(event_id, name = %row.name, capacity = row.capacity, "Event created");

        find_event(conn, event_id)?.ok_or(PersistenceError::MissingAfterInsert {
            table: "events",
            id: event_id,
        })
    })
}

/// Event statuses under which the issued counter may grow.
const SELLING_STATUSES: [EventStatus; 2] = [EventStatus::Selling, EventStatus::Active];

/// Increments the issued counter only if the event is on sale and the result
/// stays within capacity.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn reserve_capacity(
    conn: &mut SqliteConnection,
    event_id: i64,
    quantity: u32,
) -> Result<ReserveOutcome, PersistenceError> {
    let quantity: i64 = i64::from(quantity);
    let selling: Vec<&str> = SELLING_STATUSES.iter().map(EventStatus::as_str).collect();

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(events::table)
            .filter(events::event_id.eq(event_id))
            .filter(events::status.eq_any(selling))
            .filter(events::issued_count.le(events::capacity - quantity))
            .set(events::issued_count.eq(events::issued_count + quantity))
            .execute(conn)?;

        let Some(event) = find_event(conn, event_id)? else {
            return Ok(ReserveOutcome::EventNotFound);
        };

        if updated == 1 {
            debug!(event_id, quantity, issued = event.issued, "Capacity reserved");
            Ok(ReserveOutcome::Reserved {
                issued: event.issued,
            })
        } else if !event.status.allows_issuance() {
            Ok(ReserveOutcome::NotSelling {
                status: event.status,
            })
        } else {
            Ok(ReserveOutcome::CapacityExceeded {
                capacity: event.capacity,
                issued: event.issued,
            })
        }
    })
}

/// Returns a reservation to the event, never going below zero.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn release_capacity(
    conn: &mut SqliteConnection,
    event_id: i64,
    quantity: u32,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let Some(event) = find_event(conn, event_id)? else {
            warn!(event_id, "Release requested for a missing event");
            return Ok(());
        };

        let issued: u32 = event.issued.saturating_sub(quantity);
        diesel::update(events::table)
            .filter(events::event_id.eq(event_id))
            .set(events::issued_count.eq(i64::from(issued)))
            .execute(conn)?;

        debug!(event_id, quantity, issued, "Capacity released");
        Ok(())
    })
}

/// Moves an event to `target` only if it is currently in `expected`.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn compare_and_set_event_status(
    conn: &mut SqliteConnection,
    event_id: i64,
    expected: EventStatus,
    target: EventStatus,
) -> Result<CompareAndSet<Event>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(events::table)
            .filter(events::event_id.eq(event_id))
            .filter(events::status.eq(expected.as_str()))
            .set(events::status.eq(target.as_str()))
            .execute(conn)?;

        let Some(event) = find_event(conn, event_id)? else {
            return Ok(CompareAndSet::NotFound);
        };

        if updated == 1 {
            info!(event_id, from = %expected, to = %target, "Event status changed");
            Ok(CompareAndSet::Applied(event))
        } else {
            Ok(CompareAndSet::Stale(event))
        }
    })
}

/// Changes capacity while the issued counter is still zero.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn set_event_capacity(
    conn: &mut SqliteConnection,
    event_id: i64,
    capacity: u32,
) -> Result<CapacityOutcome, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(events::table)
            .filter(events::event_id.eq(event_id))
            .filter(events::issued_count.eq(0))
            .set(events::capacity.eq(i64::from(capacity)))
            .execute(conn)?;

        let Some(event) = find_event(conn, event_id)? else {
            return Ok(CapacityOutcome::EventNotFound);
        };

        if updated == 1 {
            info!(event_id, capacity, "Event capacity changed");
            Ok(CapacityOutcome::Updated(event))
        } else {
            Ok(CapacityOutcome::Locked(event))
        }
    })
}
