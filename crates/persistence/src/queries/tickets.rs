// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::StatusTransitionRecord;
use admit_domain::{Ticket, TicketId};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{HistoryRow, TicketRow};
use crate::diesel_schema::{ticket_status_history, tickets};
use crate::error::PersistenceError;

/// Retrieves a ticket by its public identifier.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be converted.
/// Returns `Ok(None)` if no ticket has that identifier.
pub fn find_ticket(
    conn: &mut SqliteConnection,
    ticket_id: &TicketId,
) -> Result<Option<Ticket>, PersistenceError> {
    debug!(ticket_id = %ticket_id, "Looking up ticket");

    tickets::table
        .filter(tickets::ticket_id.eq(ticket_id.as_str()))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()?
        .map(TicketRow::into_ticket)
        .transpose()
}

/// Lists the tickets of one event in the order they were stored.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_tickets_for_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<Ticket>, PersistenceError> {
    tickets::table
        .filter(tickets::event_id.eq(event_id))
        .order(tickets::ticket_pk.asc())
        .select(TicketRow::as_select())
        .load(conn)?
        .into_iter()
        .map(TicketRow::into_ticket)
        .collect()
}

/// Returns the recorded transitions of one ticket, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_ticket_history(
    conn: &mut SqliteConnection,
    ticket_id: &TicketId,
) -> Result<Vec<StatusTransitionRecord>, PersistenceError> {
    ticket_status_history::table
        .filter(ticket_status_history::ticket_id.eq(ticket_id.as_str()))
        .order(ticket_status_history::history_id.asc())
        .select(HistoryRow::as_select())
        .load(conn)?
        .into_iter()
        .map(HistoryRow::into_record)
        .collect()
}
