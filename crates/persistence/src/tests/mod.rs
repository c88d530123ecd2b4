// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod event_tests;

use crate::Persistence;
use admit_domain::{
    Event, EventStatus, HolderInfo, NewEvent, Price, Ticket, TicketClassCatalog, TicketId,
    TicketIdGenerator, TicketStatus, TicketTemplate,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_test_template() -> TicketTemplate {
    TicketTemplate {
        class: TicketClassCatalog::default().resolve("vip").unwrap(),
        price: Price::new(9900).unwrap(),
        holder: HolderInfo::new("Grace Hopper", "grace@example.com"),
        design_ref: None,
    }
}

/// Stores an event and walks it to `status`.
pub fn seed_event(persistence: &mut Persistence, capacity: u32, status: EventStatus) -> Event {
    let mut event = persistence
        .create_event(
            &NewEvent::new("Harbour Festival", capacity).unwrap(),
            OffsetDateTime::now_utc(),
        )
        .unwrap();
    let path: &[EventStatus] = match status {
        EventStatus::Draft => &[],
        EventStatus::Selling => &[EventStatus::Selling],
        EventStatus::Active => &[EventStatus::Selling, EventStatus::Active],
        EventStatus::Closed => &[EventStatus::Closed],
    };
    for &next in path {
        event = match persistence
            .compare_and_set_event_status(event.event_id, event.status, next)
            .unwrap()
        {
            admit::CompareAndSet::Applied(updated) => updated,
            other => panic!("failed to seed event status: {other:?}"),
        };
    }
    event
}

pub fn build_ticket(event_id: i64, status: TicketStatus) -> Ticket {
    let ticket_id: TicketId = TicketIdGenerator::new().generate().unwrap();
    Ticket::issue(
        ticket_id,
        event_id,
        &create_test_template(),
        status,
        OffsetDateTime::now_utc(),
    )
}

/// A database file path unique to this test run.
pub fn temp_database_path() -> PathBuf {
    let n: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("admit_test_{}_{n}.db", std::process::id()))
}

/// Removes a database file and its WAL side files.
pub fn remove_database(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        let _ = std::fs::remove_file(name);
    }
}
