// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Several processes may share one database file. Writers take the lock up
//! front (`BEGIN IMMEDIATE`) and wait up to [`BUSY_TIMEOUT_MS`] for it, so
//! concurrent conditional updates serialize instead of failing.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Journal mode applied when a database is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Leave `SQLite`'s default. Used for in-memory databases.
    Default,
    /// Write-ahead logging, so gate reads do not wait on issuance writes.
    Wal,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the rowid assigned by the last insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

// Diesel has no PRAGMA DSL.
fn apply_pragma(
    conn: &mut SqliteConnection,
    pragma: &'static str,
    value: &str,
) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {pragma} = {value}"))
        .execute(conn)
        .map_err(|e| PersistenceError::ConnectionSetup {
            pragma,
            reason: e.to_string(),
        })?;
    Ok(())
}

/// Fails unless foreign keys are enforced on this connection.
///
/// Tickets reference their event and history rows reference their ticket.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if
/// enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result::<ForeignKeysPragma>(conn)?;
    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Opens a database, configures the connection and migrates the schema.
///
/// # Arguments
///
/// * `database_url` - A file path or `file:` URL
/// * `journal` - Journal mode to switch to before migrating
///
/// # Errors
///
/// Returns an error if connection, configuration, migration or the foreign
/// key check fails.
pub fn open_database(
    database_url: &str,
    journal: JournalMode,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?journal, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    apply_pragma(&mut conn, "foreign_keys", "ON")?;
    apply_pragma(&mut conn, "busy_timeout", &BUSY_TIMEOUT_MS.to_string())?;
    if journal == JournalMode::Wal {
        apply_pragma(&mut conn, "journal_mode", "WAL")?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    debug!("Schema is up to date");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
