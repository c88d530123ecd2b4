// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit_domain::Event;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::EventRow;
use crate::diesel_schema::events;
use crate::error::PersistenceError;

/// Retrieves an event by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be converted.
/// Returns `Ok(None)` if the event does not exist.
pub fn find_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<Event>, PersistenceError> {
    debug!(event_id, "Looking up event");

    events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?
        .map(EventRow::into_event)
        .transpose()
}

/// Lists every event ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_events(conn: &mut SqliteConnection) -> Result<Vec<Event>, PersistenceError> {
    events::table
        .order(events::event_id.asc())
        .select(EventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EventRow::into_event)
        .collect()
}
