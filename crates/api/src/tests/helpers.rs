// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AuthenticatedActor, CreateEventRequest, IssueTicketsRequest, Role, TicketService,
    TransitionEventRequest,
};
use admit::{EngineConfig, InMemoryTicketRepository, TicketEngine};
use admit_domain::TicketClassCatalog;
use std::sync::Arc;

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::with_role("admin-1", Role::Admin)
}

pub fn organizer() -> AuthenticatedActor {
    AuthenticatedActor::with_role("organizer-1", Role::Organizer)
}

pub fn gate_staff() -> AuthenticatedActor {
    AuthenticatedActor::with_role("gate-1", Role::Gate)
}

pub fn create_test_service() -> TicketService {
    create_test_service_with(EngineConfig::default())
}

pub fn create_test_service_with(config: EngineConfig) -> TicketService {
    let repository = Arc::new(InMemoryTicketRepository::new());
    let engine = Arc::new(TicketEngine::new(repository, config));
    TicketService::new(engine, TicketClassCatalog::default())
}

pub fn issue_request(quantity: u32) -> IssueTicketsRequest {
    IssueTicketsRequest {
        quantity,
        ticket_class: String::from("student"),
        price_minor: 1200,
        holder_name: String::from("Alan Turing"),
        holder_contact: String::from("alan@example.com"),
        design_ref: None,
    }
}

/// Creates an event and walks it to `status` through the service.
pub async fn create_event_in(service: &TicketService, capacity: u32, status: &str) -> i64 {
    let event = service
        .create_event(
            &admin(),
            CreateEventRequest {
                name: String::from("Summer Concert"),
                capacity,
            },
        )
        .await
        .unwrap();
    let path: &[&str] = match status {
        "draft" => &[],
        "selling" => &["selling"],
        "active" => &["selling", "active"],
        "closed" => &["closed"],
        other => panic!("unknown event status {other}"),
    };
    for step in path {
        service
            .transition_event(
                &admin(),
                event.event_id,
                TransitionEventRequest {
                    status: (*step).to_string(),
                },
            )
            .await
            .unwrap();
    }
    event.event_id
}
