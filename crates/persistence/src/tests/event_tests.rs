// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{build_ticket, seed_event};
use crate::Persistence;
use admit::{CapacityOutcome, CompareAndSet, CreateOutcome, ReserveOutcome};
use admit_domain::{EventStatus, NewEvent, TicketStatus};
use time::OffsetDateTime;

#[test]
fn test_create_event_assigns_ids_and_draft_status() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let created_at = OffsetDateTime::now_utc();

    let first = persistence
        .create_event(&NewEvent::new("Opening Night", 100).unwrap(), created_at)
        .unwrap();
    let second = persistence
        .create_event(&NewEvent::new("Matinee", 40).unwrap(), created_at)
        .unwrap();

    assert!(second.event_id > first.event_id);
    assert_eq!(first.status, EventStatus::Draft);
    assert_eq!(first.issued, 0);
    assert_eq!(first.created_at, created_at);

    let listed = persistence.list_events().unwrap();
    assert_eq!(listed, vec![first, second]);
}

#[test]
fn test_reserve_within_capacity() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Selling);

    assert_eq!(
        persistence.reserve_capacity(event.event_id, 4).unwrap(),
        ReserveOutcome::Reserved { issued: 4 }
    );
    assert_eq!(
        persistence.reserve_capacity(event.event_id, 6).unwrap(),
        ReserveOutcome::Reserved { issued: 10 }
    );
}

#[test]
fn test_reserve_beyond_capacity_leaves_counter_unchanged() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Selling);
    persistence.reserve_capacity(event.event_id, 8).unwrap();

    assert_eq!(
        persistence.reserve_capacity(event.event_id, 3).unwrap(),
        ReserveOutcome::CapacityExceeded {
            capacity: 10,
            issued: 8
        }
    );
    assert_eq!(
        persistence.get_event(event.event_id).unwrap().unwrap().issued,
        8
    );
}

#[test]
fn test_reserve_refused_unless_event_is_on_sale() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let draft = seed_event(&mut persistence, 10, EventStatus::Draft);
    let closed = seed_event(&mut persistence, 10, EventStatus::Selling);
    persistence
        .compare_and_set_event_status(closed.event_id, EventStatus::Selling, EventStatus::Closed)
        .unwrap();

    assert_eq!(
        persistence.reserve_capacity(draft.event_id, 1).unwrap(),
        ReserveOutcome::NotSelling {
            status: EventStatus::Draft
        }
    );
    assert_eq!(
        persistence.reserve_capacity(closed.event_id, 1).unwrap(),
        ReserveOutcome::NotSelling {
            status: EventStatus::Closed
        }
    );
    assert_eq!(persistence.get_event(draft.event_id).unwrap().unwrap().issued, 0);
    assert_eq!(persistence.get_event(closed.event_id).unwrap().unwrap().issued, 0);
}

#[test]
fn test_active_event_still_sells_at_the_door() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Active);

    assert_eq!(
        persistence.reserve_capacity(event.event_id, 2).unwrap(),
        ReserveOutcome::Reserved { issued: 2 }
    );
}

#[test]
fn test_reserve_for_missing_event() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(
        persistence.reserve_capacity(404, 1).unwrap(),
        ReserveOutcome::EventNotFound
    );
}

#[test]
fn test_release_never_goes_below_zero() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Selling);
    persistence.reserve_capacity(event.event_id, 2).unwrap();

    persistence.release_capacity(event.event_id, 5).unwrap();

    assert_eq!(
        persistence.get_event(event.event_id).unwrap().unwrap().issued,
        0
    );
}

#[test]
fn test_release_for_missing_event_is_ignored() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.release_capacity(404, 1).unwrap();
}

#[test]
fn test_event_status_compare_and_set() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Draft);

    let applied = persistence
        .compare_and_set_event_status(event.event_id, EventStatus::Draft, EventStatus::Selling)
        .unwrap();
    assert!(matches!(
        applied,
        CompareAndSet::Applied(ref e) if e.status == EventStatus::Selling
    ));

    let stale = persistence
        .compare_and_set_event_status(event.event_id, EventStatus::Draft, EventStatus::Closed)
        .unwrap();
    assert!(matches!(
        stale,
        CompareAndSet::Stale(ref e) if e.status == EventStatus::Selling
    ));

    assert_eq!(
        persistence
            .compare_and_set_event_status(404, EventStatus::Draft, EventStatus::Selling)
            .unwrap(),
        CompareAndSet::NotFound
    );
}

#[test]
fn test_capacity_changes_until_first_reservation() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 10, EventStatus::Selling);

    let updated = persistence.set_event_capacity(event.event_id, 20).unwrap();
    assert!(matches!(updated, CapacityOutcome::Updated(ref e) if e.capacity == 20));

    persistence.reserve_capacity(event.event_id, 1).unwrap();
    let locked = persistence.set_event_capacity(event.event_id, 30).unwrap();
    assert!(matches!(
        locked,
        CapacityOutcome::Locked(ref e) if e.capacity == 20 && e.issued == 1
    ));

    assert_eq!(
        persistence.set_event_capacity(404, 5).unwrap(),
        CapacityOutcome::EventNotFound
    );
}

#[test]
fn test_tickets_require_existing_event() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let ticket = build_ticket(404, TicketStatus::Valid);

    let result = persistence.create_ticket(&ticket);

    assert!(result.is_err());
    assert!(persistence.get_ticket(&ticket.ticket_id).unwrap().is_none());
}

#[test]
fn test_create_ticket_for_seeded_event() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event = seed_event(&mut persistence, 1, EventStatus::Selling);
    let ticket = build_ticket(event.event_id, TicketStatus::Valid);

    assert_eq!(
        persistence.create_ticket(&ticket).unwrap(),
        CreateOutcome::Created
    );
}
