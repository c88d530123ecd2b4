// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service boundary of the Admit ticketing engine.
//!
//! [`TicketService`] is what transports call. Each operation authorizes the
//! actor, turns request DTOs into domain values, runs the engine and
//! translates the result. Core and domain errors never cross this boundary
//! untranslated.

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

mod auth;
mod error;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, Operation, PermissionGate, PermissionSet, Role, WILDCARD_TOKEN,
};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use request_response::{
    CancelTicketResponse, ConfirmTicketResponse, CreateEventRequest, EventResponse,
    IssueTicketsRequest, IssueTicketsResponse, ListEventsResponse, ListTicketsResponse,
    SetCapacityRequest, TicketHistoryResponse, TicketResponse, TransitionEventRequest,
    TransitionResponse, UpdateHolderRequest, ValidateScanRequest, ValidateScanResponse,
};

use admit::{CancelOutcome, ConfirmOutcome, IssuanceBatch, TicketEngine, ValidationOutcome};
use admit_domain::{
    EventStatus, GateId, HolderInfo, Price, Ticket, TicketClass, TicketClassCatalog, TicketId,
    TicketTemplate,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Operations offered to transports.
pub struct TicketService {
    engine: Arc<TicketEngine>,
    catalog: TicketClassCatalog,
}

impl TicketService {
    #[must_use]
    pub const fn new(engine: Arc<TicketEngine>, catalog: TicketClassCatalog) -> Self {
        Self { engine, catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &TicketClassCatalog {
        &self.catalog
    }

    /// Issues `request.quantity` tickets for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not issue tickets, the request is
    /// invalid, the event cannot sell or the batch does not fit. A failed
    /// batch leaves no tickets behind.
    pub async fn issue_tickets(
        &self,
        actor: &AuthenticatedActor,
        event_id: i64,
        request: IssueTicketsRequest,
    ) -> Result<IssueTicketsResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::IssueTickets)?;

        let class: TicketClass = self
            .catalog
            .resolve(&request.ticket_class)
            .map_err(translate_domain_error)?;
        let price: Price = Price::new(request.price_minor).map_err(translate_domain_error)?;
        let batch = IssuanceBatch {
            event_id,
            quantity: request.quantity,
            template: TicketTemplate {
                class,
                price,
                holder: HolderInfo::new(&request.holder_name, &request.holder_contact),
                design_ref: request.design_ref,
            },
        };

        let tickets: Vec<Ticket> = self
            .engine
            .issue(&batch)
            .await
            .map_err(translate_core_error)?;

        info!(
            actor = %actor.id,
            event_id,
            quantity = tickets.len(),
            "Tickets issued"
        );
        let tickets: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
        Ok(IssueTicketsResponse {
            event_id,
            ticket_ids: tickets.iter().map(|t| t.ticket_id.clone()).collect(),
            tickets,
        })
    }

    /// Cancels a ticket. Cancelling a cancelled ticket succeeds unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not cancel, the ticket does not
    /// exist or it has already been scanned.
    pub async fn cancel_ticket(
        &self,
        actor: &AuthenticatedActor,
        ticket_id: &str,
    ) -> Result<CancelTicketResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::CancelTicket)?;
        let ticket_id: TicketId = parse_ticket_id(ticket_id)?;

        let outcome = self
            .engine
            .cancel(&ticket_id)
            .await
            .map_err(translate_core_error)?;

        Ok(match outcome {
            CancelOutcome::Cancelled(ticket) => {
                info!(actor = %actor.id, ticket_id = %ticket_id, "Ticket cancelled");
                CancelTicketResponse {
                    ticket: ticket.into(),
                    already_cancelled: false,
                }
            }
            CancelOutcome::AlreadyCancelled(ticket) => CancelTicketResponse {
                ticket: ticket.into(),
                already_cancelled: true,
            },
        })
    }

    /// Confirms a pending ticket.
    ///
    /// Requires the issuance permission.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not issue tickets, the ticket does
    /// not exist or it was cancelled.
    pub async fn confirm_ticket(
        &self,
        actor: &AuthenticatedActor,
        ticket_id: &str,
    ) -> Result<ConfirmTicketResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::IssueTickets)?;
        let ticket_id: TicketId = parse_ticket_id(ticket_id)?;

        let outcome = self
            .engine
            .confirm(&ticket_id)
            .await
            .map_err(translate_core_error)?;

        Ok(match outcome {
            ConfirmOutcome::Confirmed(ticket) => {
                info!(actor = %actor.id, ticket_id = %ticket_id, "Ticket confirmed");
                ConfirmTicketResponse {
                    ticket: ticket.into(),
                    already_confirmed: false,
                }
            }
            ConfirmOutcome::AlreadyConfirmed(ticket) => ConfirmTicketResponse {
                ticket: ticket.into(),
                already_confirmed: true,
            },
        })
    }

    /// Validates a scanned code at a gate.
    ///
    /// Repeats, rejections and unknown codes are successful responses with
    /// `admit = false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not validate scans, the gate id is
    /// invalid, or the engine fails.
    pub async fn validate_scan(
        &self,
        actor: &AuthenticatedActor,
        request: ValidateScanRequest,
    ) -> Result<ValidateScanResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ValidateScan)?;
        let gate: GateId = GateId::new(&request.gate_id).map_err(translate_domain_error)?;

        let outcome: ValidationOutcome = self
            .engine
            .validate_scan(&request.code, &gate)
            .await
            .map_err(translate_core_error)?;

        debug!(actor = %actor.id, gate = %gate, outcome = outcome.kind(), "Scan validated");
        Ok(outcome.into())
    }

    /// Replaces holder details of a ticket that is neither scanned nor
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not issue tickets, the holder is
    /// invalid, the ticket does not exist or it is locked.
    pub async fn update_holder(
        &self,
        actor: &AuthenticatedActor,
        ticket_id: &str,
        request: UpdateHolderRequest,
    ) -> Result<TicketResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::IssueTickets)?;
        let ticket_id: TicketId = parse_ticket_id(ticket_id)?;
        let holder = HolderInfo::new(&request.holder_name, &request.holder_contact);

        let ticket: Ticket = self
            .engine
            .update_holder(&ticket_id, &holder)
            .await
            .map_err(translate_core_error)?;

        info!(actor = %actor.id, ticket_id = %ticket_id, "Holder updated");
        Ok(ticket.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not view tickets or the ticket does
    /// not exist.
    pub async fn get_ticket(
        &self,
        actor: &AuthenticatedActor,
        ticket_id: &str,
    ) -> Result<TicketResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ViewTickets)?;
        let ticket_id: TicketId = parse_ticket_id(ticket_id)?;

        let ticket: Ticket = self
            .engine
            .get_ticket(&ticket_id)
            .await
            .map_err(translate_core_error)?;
        Ok(ticket.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not view tickets or the event does
    /// not exist.
    pub async fn list_tickets(
        &self,
        actor: &AuthenticatedActor,
        event_id: i64,
    ) -> Result<ListTicketsResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ViewTickets)?;

        let tickets: Vec<Ticket> = self
            .engine
            .list_tickets(event_id)
            .await
            .map_err(translate_core_error)?;
        Ok(ListTicketsResponse {
            event_id,
            tickets: tickets.into_iter().map(TicketResponse::from).collect(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not view tickets or the ticket does
    /// not exist.
    pub async fn ticket_history(
        &self,
        actor: &AuthenticatedActor,
        ticket_id: &str,
    ) -> Result<TicketHistoryResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ViewTickets)?;
        let ticket_id: TicketId = parse_ticket_id(ticket_id)?;

        let history = self
            .engine
            .ticket_history(&ticket_id)
            .await
            .map_err(translate_core_error)?;
        Ok(TicketHistoryResponse {
            ticket_id: ticket_id.as_str().to_string(),
            transitions: history.into_iter().map(TransitionResponse::from).collect(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not manage events or the request is
    /// invalid.
    pub async fn create_event(
        &self,
        actor: &AuthenticatedActor,
        request: CreateEventRequest,
    ) -> Result<EventResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ManageEvents)?;

        let event = self
            .engine
            .create_event(&request.name, request.capacity)
            .await
            .map_err(translate_core_error)?;

        info!(actor = %actor.id, event_id = event.event_id, "Event created");
        Ok(event.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not manage events, the status is
    /// unknown, the event does not exist or the move is not allowed.
    pub async fn transition_event(
        &self,
        actor: &AuthenticatedActor,
        event_id: i64,
        request: TransitionEventRequest,
    ) -> Result<EventResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ManageEvents)?;
        let target: EventStatus = request
            .status
            .trim()
            .to_lowercase()
            .parse()
            .map_err(translate_domain_error)?;

        let event = self
            .engine
            .transition_event(event_id, target)
            .await
            .map_err(translate_core_error)?;

        info!(actor = %actor.id, event_id, status = %event.status, "Event status set");
        Ok(event.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not manage events, the capacity is
    /// invalid, the event does not exist or tickets were already issued.
    pub async fn set_event_capacity(
        &self,
        actor: &AuthenticatedActor,
        event_id: i64,
        request: SetCapacityRequest,
    ) -> Result<EventResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ManageEvents)?;

        let event = self
            .engine
            .set_event_capacity(event_id, request.capacity)
            .await
            .map_err(translate_core_error)?;

        info!(actor = %actor.id, event_id, capacity = event.capacity, "Event capacity set");
        Ok(event.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not view tickets or the event does
    /// not exist.
    pub async fn get_event(
        &self,
        actor: &AuthenticatedActor,
        event_id: i64,
    ) -> Result<EventResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ViewTickets)?;

        let event = self
            .engine
            .get_event(event_id)
            .await
            .map_err(translate_core_error)?;
        Ok(event.into())
    }

    /// # Errors
    ///
    /// Returns an error if the actor may not view tickets.
    pub async fn list_events(
        &self,
        actor: &AuthenticatedActor,
    ) -> Result<ListEventsResponse, ApiError> {
        PermissionGate::authorize(actor, Operation::ViewTickets)?;

        let events = self
            .engine
            .list_events()
            .await
            .map_err(translate_core_error)?;
        Ok(ListEventsResponse {
            events: events.into_iter().map(EventResponse::from).collect(),
        })
    }
}

/// Accepts identifiers in any case, as typed by staff.
fn parse_ticket_id(value: &str) -> Result<TicketId, ApiError> {
    TicketId::parse(value.trim()).map_err(translate_domain_error)
}
