// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the Admit ticketing engine.
//!
//! This crate stores events, tickets and per-ticket status history with
//! Diesel. [`SqliteTicketRepository`] adapts it to the engine's
//! `TicketRepository` seam.
//!
//! ## Atomicity
//!
//! The engine relies on two conditional writes being atomic even when
//! several server processes share one database file:
//!
//! - ticket status compare-and-set (`UPDATE ... WHERE status = ?`)
//! - capacity reservation (`UPDATE ... WHERE issued_count <= capacity - ?`)
//!
//! Both run in `BEGIN IMMEDIATE` transactions and decide on the affected row
//! count, so the database itself arbitrates races. The schema repeats the
//! counter bounds and the scan-metadata rule as `CHECK` constraints.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory` hands out an isolated shared-cache database
//! per call, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use admit::{
    CapacityOutcome, CompareAndSet, CreateOutcome, ReserveOutcome, StatusChange,
    StatusTransitionRecord,
};
use admit_domain::{Event, EventStatus, HolderInfo, NewEvent, Ticket, TicketId, TicketStatus};
use crate::backend::sqlite::JournalMode;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repository;

#[cfg(test)]
mod tests;

pub use backend::sqlite::BUSY_TIMEOUT_MS;
pub use error::PersistenceError;
pub use repository::SqliteTicketRepository;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A single `SQLite` connection with the ticketing schema applied.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open_database(&shared_memory_url, JournalMode::Default)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a database file, creating it if
    /// needed.
    ///
    /// Several adapters, in one process or many, may open the same file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: &Path = path.as_ref();
        let path_str: &str = path
            .to_str()
            .ok_or_else(|| PersistenceError::InvalidPath(path.display().to_string()))?;

        let conn: SqliteConnection = backend::sqlite::open_database(path_str, JournalMode::Wal)?;

        Ok(Self { conn })
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_ticket(&mut self, ticket: &Ticket) -> Result<CreateOutcome, PersistenceError> {
        mutations::insert_ticket(&mut self.conn, ticket)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket(&mut self, ticket_id: &TicketId) -> Result<Option<Ticket>, PersistenceError> {
        queries::find_ticket(&mut self.conn, ticket_id)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn compare_and_set_status(
        &mut self,
        ticket_id: &TicketId,
        expected: TicketStatus,
        change: &StatusChange,
    ) -> Result<CompareAndSet<Ticket>, PersistenceError> {
        mutations::compare_and_set_status(&mut self.conn, ticket_id, expected, change)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn reserve_capacity(
        &mut self,
        event_id: i64,
        quantity: u32,
    ) -> Result<ReserveOutcome, PersistenceError> {
        mutations::reserve_capacity(&mut self.conn, event_id, quantity)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn release_capacity(&mut self, event_id: i64, quantity: u32) -> Result<(), PersistenceError> {
        mutations::release_capacity(&mut self.conn, event_id, quantity)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn discard_ticket(&mut self, ticket_id: &TicketId) -> Result<(), PersistenceError> {
        mutations::discard_ticket(&mut self.conn, ticket_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_event(&mut self, event_id: i64) -> Result<Option<Event>, PersistenceError> {
        queries::find_event(&mut self.conn, event_id)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_event(
        &mut self,
        event: &NewEvent,
        created_at: OffsetDateTime,
    ) -> Result<Event, PersistenceError> {
        mutations::insert_event(&mut self.conn, event, created_at)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn compare_and_set_event_status(
        &mut self,
        event_id: i64,
        expected: EventStatus,
        target: EventStatus,
    ) -> Result<CompareAndSet<Event>, PersistenceError> {
        mutations::compare_and_set_event_status(&mut self.conn, event_id, expected, target)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn set_event_capacity(
        &mut self,
        event_id: i64,
        capacity: u32,
    ) -> Result<CapacityOutcome, PersistenceError> {
        mutations::set_event_capacity(&mut self.conn, event_id, capacity)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events(&mut self) -> Result<Vec<Event>, PersistenceError> {
        queries::list_events(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets(&mut self, event_id: i64) -> Result<Vec<Ticket>, PersistenceError> {
        queries::list_tickets_for_event(&mut self.conn, event_id)
    }

    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub fn update_holder(
        &mut self,
        ticket_id: &TicketId,
        holder: &HolderInfo,
    ) -> Result<CompareAndSet<Ticket>, PersistenceError> {
        mutations::update_holder(&mut self.conn, ticket_id, holder)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn ticket_history(
        &mut self,
        ticket_id: &TicketId,
    ) -> Result<Vec<StatusTransitionRecord>, PersistenceError> {
        queries::list_ticket_history(&mut self.conn, ticket_id)
    }
}
