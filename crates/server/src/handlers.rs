// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Handlers authenticate the actor named in the request, then delegate to
//! [`TicketService`](admit_api::TicketService). Write requests carry the
//! actor as `actor_id` plus either `actor_role` or `actor_permissions` body
//! fields; read requests carry them as query parameters.

use admit_api::{
    ApiError, AuthError, AuthenticatedActor, CancelTicketResponse, ConfirmTicketResponse,
    CreateEventRequest, EventResponse, IssueTicketsRequest, IssueTicketsResponse,
    ListEventsResponse, ListTicketsResponse, SetCapacityRequest, TicketHistoryResponse,
    TicketResponse, TransitionEventRequest, UpdateHolderRequest, ValidateScanRequest,
    ValidateScanResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AppState;
use crate::error::HttpError;

/// The caller's claimed identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorFields {
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<String>,
    /// Comma-separated permission tokens, e.g. `scans.validate,tickets.view`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_permissions: Option<String>,
}

impl ActorFields {
    fn authenticate(&self) -> Result<AuthenticatedActor, HttpError> {
        let result = match (&self.actor_role, &self.actor_permissions) {
            (Some(role), None) => AuthenticatedActor::authenticate(&self.actor_id, role),
            (None, Some(tokens)) => {
                AuthenticatedActor::authenticate_with_permissions(&self.actor_id, tokens)
            }
            _ => Err(AuthError::AuthenticationFailed {
                reason: String::from("exactly one of actor_role or actor_permissions is required"),
            }),
        };
        result.map_err(|err| HttpError::from(ApiError::from(err)))
    }
}

/// A request body with the actor fields alongside the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WithActor<T> {
    #[serde(flatten)]
    pub actor: ActorFields,
    #[serde(flatten)]
    pub body: T,
}

/// Handler for POST `/events`.
pub async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WithActor<CreateEventRequest>>,
) -> Result<Json<EventResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        name = %req.body.name,
        capacity = req.body.capacity,
        "Handling create_event request"
    );
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    let response: EventResponse = app_state.service.create_event(&actor, req.body).await?;
    Ok(Json(response))
}

/// Handler for GET `/events`.
pub async fn handle_list_events(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorFields>,
) -> Result<Json<ListEventsResponse>, HttpError> {
    debug!(actor_id = %query.actor_id, "Handling list_events request");
    let actor: AuthenticatedActor = query.authenticate()?;
    Ok(Json(app_state.service.list_events(&actor).await?))
}

/// Handler for GET `/events/{event_id}`.
pub async fn handle_get_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<ActorFields>,
) -> Result<Json<EventResponse>, HttpError> {
    debug!(actor_id = %query.actor_id, event_id, "Handling get_event request");
    let actor: AuthenticatedActor = query.authenticate()?;
    Ok(Json(app_state.service.get_event(&actor, event_id).await?))
}

/// Handler for POST `/events/{event_id}/status`.
pub async fn handle_transition_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WithActor<TransitionEventRequest>>,
) -> Result<Json<EventResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        event_id,
        status = %req.body.status,
        "Handling transition_event request"
    );
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    let response: EventResponse = app_state
        .service
        .transition_event(&actor, event_id, req.body)
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/events/{event_id}/capacity`.
pub async fn handle_set_event_capacity(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WithActor<SetCapacityRequest>>,
) -> Result<Json<EventResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        event_id,
        capacity = req.body.capacity,
        "Handling set_event_capacity request"
    );
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    let response: EventResponse = app_state
        .service
        .set_event_capacity(&actor, event_id, req.body)
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/events/{event_id}/tickets`.
pub async fn handle_issue_tickets(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WithActor<IssueTicketsRequest>>,
) -> Result<Json<IssueTicketsResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        event_id,
        quantity = req.body.quantity,
        ticket_class = %req.body.ticket_class,
        "Handling issue_tickets request"
    );
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    let response: IssueTicketsResponse = app_state
        .service
        .issue_tickets(&actor, event_id, req.body)
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/tickets`.
pub async fn handle_list_tickets(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<ActorFields>,
) -> Result<Json<ListTicketsResponse>, HttpError> {
    debug!(actor_id = %query.actor_id, event_id, "Handling list_tickets request");
    let actor: AuthenticatedActor = query.authenticate()?;
    Ok(Json(app_state.service.list_tickets(&actor, event_id).await?))
}

/// Handler for GET `/tickets/{ticket_id}`.
pub async fn handle_get_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<String>,
    Query(query): Query<ActorFields>,
) -> Result<Json<TicketResponse>, HttpError> {
    debug!(actor_id = %query.actor_id, %ticket_id, "Handling get_ticket request");
    let actor: AuthenticatedActor = query.authenticate()?;
    Ok(Json(app_state.service.get_ticket(&actor, &ticket_id).await?))
}

/// Handler for GET `/tickets/{ticket_id}/history`.
pub async fn handle_ticket_history(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<String>,
    Query(query): Query<ActorFields>,
) -> Result<Json<TicketHistoryResponse>, HttpError> {
    debug!(actor_id = %query.actor_id, %ticket_id, "Handling ticket_history request");
    let actor: AuthenticatedActor = query.authenticate()?;
    Ok(Json(
        app_state.service.ticket_history(&actor, &ticket_id).await?,
    ))
}

/// Handler for POST `/tickets/{ticket_id}/confirm`.
pub async fn handle_confirm_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<ActorFields>,
) -> Result<Json<ConfirmTicketResponse>, HttpError> {
    info!(actor_id = %req.actor_id, %ticket_id, "Handling confirm_ticket request");
    let actor: AuthenticatedActor = req.authenticate()?;
    Ok(Json(
        app_state.service.confirm_ticket(&actor, &ticket_id).await?,
    ))
}

/// Handler for POST `/tickets/{ticket_id}/cancel`.
pub async fn handle_cancel_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<ActorFields>,
) -> Result<Json<CancelTicketResponse>, HttpError> {
    info!(actor_id = %req.actor_id, %ticket_id, "Handling cancel_ticket request");
    let actor: AuthenticatedActor = req.authenticate()?;
    Ok(Json(
        app_state.service.cancel_ticket(&actor, &ticket_id).await?,
    ))
}

/// Handler for POST `/tickets/{ticket_id}/holder`.
pub async fn handle_update_holder(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<WithActor<UpdateHolderRequest>>,
) -> Result<Json<TicketResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, %ticket_id, "Handling update_holder request");
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    let response: TicketResponse = app_state
        .service
        .update_holder(&actor, &ticket_id, req.body)
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/scans`.
///
/// Every scan outcome, including refusals, is a 200 response; `admit` in
/// the body says whether to let the holder in.
pub async fn handle_validate_scan(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WithActor<ValidateScanRequest>>,
) -> Result<Json<ValidateScanResponse>, HttpError> {
    debug!(
        actor_id = %req.actor.actor_id,
        gate_id = %req.body.gate_id,
        "Handling validate_scan request"
    );
    let actor: AuthenticatedActor = req.actor.authenticate()?;
    Ok(Json(app_state.service.validate_scan(&actor, req.body).await?))
}
