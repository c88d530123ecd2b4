// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{FlakyRepository, create_test_engine, create_test_template, seed_event};
use crate::{EngineConfig, IssuanceBatch, RejectionReason, TicketEngine, ValidationOutcome};
use std::sync::Arc;
use admit_domain::{EventStatus, GateId, Ticket, TicketId, TicketStatus, qr_payload};

fn gate(name: &str) -> GateId {
    GateId::new(name).unwrap()
}

async fn issue_one(engine: &TicketEngine, event_id: i64) -> Ticket {
    let batch = IssuanceBatch {
        event_id,
        quantity: 1,
        template: create_test_template(),
    };
    engine.issue(&batch).await.unwrap().remove(0)
}

#[tokio::test]
async fn test_valid_ticket_is_admitted() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;

    let outcome = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();

    match outcome {
        ValidationOutcome::Admitted { ticket: admitted } => {
            assert_eq!(admitted.status, TicketStatus::Scanned);
            let scan = admitted.scan.as_ref().unwrap();
            assert_eq!(scan.gate_id, gate("north-1"));
            assert!(admitted.scan_metadata_consistent());
        }
        other => panic!("expected admission, got {other:?}"),
    }
}

#[tokio::test]
async fn test_scan_twice_reports_original_admission() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;

    let first = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();
    let ValidationOutcome::Admitted { ticket: admitted } = first else {
        panic!("first scan must admit");
    };
    let original = admitted.scan.unwrap();

    let second = engine
        .validate_scan(&ticket.qr_payload, &gate("south-2"))
        .await
        .unwrap();

    assert_eq!(
        second,
        ValidationOutcome::AlreadyScanned {
            ticket_id: ticket.ticket_id.clone(),
            scanned_at: original.scanned_at,
            gate_id: gate("north-1"),
        }
    );
}

#[tokio::test]
async fn test_cancelled_ticket_is_rejected() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;
    engine.cancel(&ticket.ticket_id).await.unwrap();

    let outcome = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::Rejected {
            ticket_id: ticket.ticket_id.clone(),
            reason: RejectionReason::Cancelled,
        }
    );
    assert_eq!(
        engine.get_ticket(&ticket.ticket_id).await.unwrap().status,
        TicketStatus::Cancelled
    );
}

#[tokio::test]
async fn test_pending_ticket_is_not_confirmed() {
    let config = EngineConfig {
        deferred_confirmation: true,
        ..EngineConfig::default()
    };
    let (repository, engine) = create_test_engine(config);
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;

    let outcome = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::Rejected {
            ticket_id: ticket.ticket_id,
            reason: RejectionReason::NotConfirmed,
        }
    );
}

#[tokio::test]
async fn test_payload_for_other_event_is_rejected() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;
    let forged = qr_payload(event.event_id + 100, &ticket.ticket_id);

    let outcome = engine
        .validate_scan(&forged, &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::Rejected {
            ticket_id: ticket.ticket_id.clone(),
            reason: RejectionReason::EventMismatch,
        }
    );
    assert_eq!(
        engine.get_ticket(&ticket.ticket_id).await.unwrap().status,
        TicketStatus::Valid
    );
}

#[tokio::test]
async fn test_manual_entry_of_bare_identifier() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;
    let typed = ticket.ticket_id.as_str().to_lowercase();

    let outcome = engine.validate_scan(&typed, &gate("desk")).await.unwrap();

    assert!(matches!(outcome, ValidationOutcome::Admitted { .. }));
}

#[tokio::test]
async fn test_malformed_code() {
    let (_repository, engine) = create_test_engine(EngineConfig::default());

    let outcome = engine
        .validate_scan("not a ticket", &gate("north-1"))
        .await
        .unwrap();

    assert!(matches!(outcome, ValidationOutcome::MalformedCode { .. }));
    assert_eq!(outcome.kind(), "malformed_code");
}

#[tokio::test]
async fn test_tampered_payload_is_malformed() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Active).await;
    let ticket = issue_one(&engine, event.event_id).await;
    let mut tampered = ticket.qr_payload.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == '0' { '1' } else { '0' });

    let outcome = engine
        .validate_scan(&tampered, &gate("north-1"))
        .await
        .unwrap();

    assert!(matches!(outcome, ValidationOutcome::MalformedCode { .. }));
}

#[tokio::test]
async fn test_unknown_identifier_is_not_found() {
    let (_repository, engine) = create_test_engine(EngineConfig::default());
    let ticket_id = TicketId::parse("ABCDEFGHJKMNPQRS").unwrap();

    let outcome = engine
        .validate_scan(ticket_id.as_str(), &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(outcome, ValidationOutcome::NotFound { ticket_id });
}

#[tokio::test]
async fn test_event_not_yet_admitting() {
    let (repository, engine) = create_test_engine(EngineConfig::default());
    let event = seed_event(repository.as_ref(), 5, EventStatus::Selling).await;
    let ticket = issue_one(&engine, event.event_id).await;

    let outcome = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::EventNotActive {
            ticket_id: ticket.ticket_id.clone(),
            event_id: event.event_id,
            status: EventStatus::Selling,
        }
    );
    assert_eq!(
        engine.get_ticket(&ticket.ticket_id).await.unwrap().status,
        TicketStatus::Valid
    );
}

#[tokio::test]
async fn test_cancel_racing_admission_is_rejected() {
    let flaky = Arc::new(FlakyRepository::new().cancelling_before_status_change());
    let event = seed_event(flaky.as_ref(), 5, EventStatus::Active).await;
    let engine = TicketEngine::new(flaky.clone(), EngineConfig::default());
    let ticket = issue_one(&engine, event.event_id).await;

    let outcome = engine
        .validate_scan(&ticket.qr_payload, &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::Rejected {
            ticket_id: ticket.ticket_id.clone(),
            reason: RejectionReason::Cancelled,
        }
    );
    let history = engine.ticket_history(&ticket.ticket_id).await.unwrap();
    assert!(history.iter().all(|r| r.to != TicketStatus::Scanned));
}

#[tokio::test]
async fn test_ticket_removed_before_admission_is_not_found() {
    let flaky = Arc::new(FlakyRepository::new().discarding_before_status_change());
    let event = seed_event(flaky.as_ref(), 5, EventStatus::Active).await;
    let engine = TicketEngine::new(flaky.clone(), EngineConfig::default());
    let ticket = issue_one(&engine, event.event_id).await;

    let outcome = engine
        .validate_scan(ticket.ticket_id.as_str(), &gate("north-1"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ValidationOutcome::NotFound {
            ticket_id: ticket.ticket_id
        }
    );
}

#[test]
fn test_rejection_reason_names() {
    assert_eq!(RejectionReason::Cancelled.as_str(), "cancelled");
    assert_eq!(RejectionReason::NotConfirmed.as_str(), "not_confirmed");
    assert_eq!(RejectionReason::EventMismatch.to_string(), "event_mismatch");
}
