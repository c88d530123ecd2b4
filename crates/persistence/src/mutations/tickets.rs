// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::{CompareAndSet, CreateOutcome, StatusChange};
use admit_domain::{HolderInfo, Ticket, TicketId, TicketStatus};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, info};

use crate::data_models::{NewHistoryRow, NewTicketRow, format_timestamp};
use crate::diesel_schema::{ticket_status_history, tickets};
use crate::error::PersistenceError;
use crate::queries::find_ticket;

/// Statuses in which holder details may still be edited.
const EDITABLE_STATUSES: [TicketStatus; 2] = [TicketStatus::Pending, TicketStatus::Valid];

/// Inserts a ticket together with its creation history record.
///
/// A unique-constraint hit on the identifier is reported as
/// [`CreateOutcome::DuplicateIdentifier`] and leaves nothing behind.
///
/// # Errors
///
/// Returns an error for any other database failure.
pub fn insert_ticket(
    conn: &mut SqliteConnection,
    ticket: &Ticket,
) -> Result<CreateOutcome, PersistenceError> {
    let row: NewTicketRow = NewTicketRow::from_ticket(ticket)?;
    let history = NewHistoryRow {
        ticket_id: row.ticket_id.clone(),
        from_status: None,
        to_status: row.status.clone(),
        transitioned_at: row.purchased_at.clone(),
        gate_id: None,
    };

    conn.immediate_transaction(|conn| {
        match diesel::insert_into(tickets::table)
            .values(&row)
            .execute(conn)
        {
            Ok(_) => {}
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                debug!(ticket_id = %row.ticket_id, "Ticket identifier already taken");
                return Ok(CreateOutcome::DuplicateIdentifier);
            }
            Err(e) => return Err(e.into()),
        }

        diesel::insert_into(ticket_status_history::table)
            .values(&history)
            .execute(conn)?;

        Ok(CreateOutcome::Created)
    })
}

/// Applies `change` only if the ticket is in `expected`, recording the
/// transition in the same transaction.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn compare_and_set_status(
    conn: &mut SqliteConnection,
    ticket_id: &TicketId,
    expected: TicketStatus,
    change: &StatusChange,
) -> Result<CompareAndSet<Ticket>, PersistenceError> {
    let at: String = format_timestamp(change.at())?;
    let scanned_at: Option<String> = change
        .scan()
        .map(|scan| format_timestamp(scan.scanned_at))
        .transpose()?;
    let gate_id: Option<String> = change.scan().map(|scan| scan.gate_id.as_str().to_string());

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(tickets::table)
            .filter(tickets::ticket_id.eq(ticket_id.as_str()))
            .filter(tickets::status.eq(expected.as_str()))
            .set((
                tickets::status.eq(change.target().as_str()),
                tickets::scanned_at.eq(&scanned_at),
                tickets::gate_id.eq(&gate_id),
            ))
            .execute(conn)?;

        if updated == 1 {
            diesel::insert_into(ticket_status_history::table)
                .values(&NewHistoryRow {
                    ticket_id: ticket_id.as_str().to_string(),
                    from_status: Some(expected.as_str().to_string()),
                    to_status: change.target().as_str().to_string(),
                    transitioned_at: at,
                    gate_id,
                })
                .execute(conn)?;
        }

        let Some(ticket) = find_ticket(conn, ticket_id)? else {
            return Ok(CompareAndSet::NotFound);
        };

        if updated == 1 {
            info!(
                ticket_id = %ticket_id,
                from = %expected,
                to = %change.target(),
                "Ticket status changed"
            );
            Ok(CompareAndSet::Applied(ticket))
        } else {
            Ok(CompareAndSet::Stale(ticket))
        }
    })
}

/// Replaces holder details while the ticket is not terminal.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn update_holder(
    conn: &mut SqliteConnection,
    ticket_id: &TicketId,
    holder: &HolderInfo,
) -> Result<CompareAndSet<Ticket>, PersistenceError> {
    let editable: Vec<&str> = EDITABLE_STATUSES
        .iter()
        .map(TicketStatus::as_str)
        .collect();

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(tickets::table)
            .filter(tickets::ticket_id.eq(ticket_id.as_str()))
            .filter(tickets::status.eq_any(editable))
            .set((
                tickets::holder_name.eq(&holder.name),
                tickets::holder_contact.eq(&holder.contact),
            ))
            .execute(conn)?;

        let Some(ticket) = find_ticket(conn, ticket_id)? else {
            return Ok(CompareAndSet::NotFound);
        };

        if updated == 1 {
            debug!(ticket_id = %ticket_id, "Holder details updated");
            Ok(CompareAndSet::Applied(ticket))
        } else {
            Ok(CompareAndSet::Stale(ticket))
        }
    })
}

/// Removes a ticket and its history. Missing tickets are not an error.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn discard_ticket(
    conn: &mut SqliteConnection,
    ticket_id: &TicketId,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::delete(
            ticket_status_history::table
                .filter(ticket_status_history::ticket_id.eq(ticket_id.as_str())),
        )
        .execute(conn)?;
        let removed: usize =
            diesel::delete(tickets::table.filter(tickets::ticket_id.eq(ticket_id.as_str())))
                .execute(conn)?;

        debug!(ticket_id = %ticket_id, removed, "Ticket discarded");
        Ok(())
    })
}
