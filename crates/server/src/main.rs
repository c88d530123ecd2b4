// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;

#[cfg(test)]
mod tests;

use admit::{
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_IDENTIFIER_ATTEMPTS, EngineConfig, TicketEngine,
    TicketRepository,
};
use admit_api::TicketService;
use admit_domain::{DomainError, TicketClassCatalog};
use admit_persistence::{Persistence, SqliteTicketRepository};
use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use handlers::{
    handle_cancel_ticket, handle_confirm_ticket, handle_create_event, handle_get_event,
    handle_get_ticket, handle_issue_tickets, handle_list_events, handle_list_tickets,
    handle_set_event_capacity, handle_ticket_history, handle_transition_event,
    handle_update_holder, handle_validate_scan,
};

/// Admit Server - HTTP server for ticket issuance and gate validation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Comma-separated ticket classes accepted at issuance
    #[arg(long, value_delimiter = ',', default_value = "VIP,GENERAL,STUDENT")]
    ticket_classes: Vec<String>,

    /// Issue tickets as pending and require a separate confirmation
    #[arg(long)]
    deferred_confirmation: bool,

    /// Deadline for each request, in milliseconds
    #[arg(long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    request_timeout_ms: u64,

    /// Identifier attempts per ticket before a batch fails
    #[arg(long, default_value_t = DEFAULT_MAX_IDENTIFIER_ATTEMPTS)]
    max_identifier_attempts: u32,

    /// Largest number of tickets a single request may issue
    #[arg(long, default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    max_batch_size: u32,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let timeout: Duration = Duration::from_millis(self.request_timeout_ms);
        EngineConfig {
            deferred_confirmation: self.deferred_confirmation,
            max_identifier_attempts: self.max_identifier_attempts,
            max_batch_size: self.max_batch_size,
            request_timeout: timeout,
            rollback_timeout: timeout,
        }
    }

    fn catalog(&self) -> Result<TicketClassCatalog, DomainError> {
        TicketClassCatalog::new(&self.ticket_classes)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    service: Arc<TicketService>,
}

impl AppState {
    fn new(persistence: Persistence, config: EngineConfig, catalog: TicketClassCatalog) -> Self {
        let repository: Arc<dyn TicketRepository> =
            Arc::new(SqliteTicketRepository::new(persistence));
        let engine: Arc<TicketEngine> = Arc::new(TicketEngine::new(repository, config));
        Self {
            service: Arc::new(TicketService::new(engine, catalog)),
        }
    }
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/events", post(handle_create_event).get(handle_list_events))
        .route("/events/{event_id}", get(handle_get_event))
        .route("/events/{event_id}/status", post(handle_transition_event))
        .route("/events/{event_id}/capacity", post(handle_set_event_capacity))
        .route(
            "/events/{event_id}/tickets",
            post(handle_issue_tickets).get(handle_list_tickets),
        )
        .route("/tickets/{ticket_id}", get(handle_get_ticket))
        .route("/tickets/{ticket_id}/history", get(handle_ticket_history))
        .route("/tickets/{ticket_id}/confirm", post(handle_confirm_ticket))
        .route("/tickets/{ticket_id}/cancel", post(handle_cancel_ticket))
        .route("/tickets/{ticket_id}/holder", post(handle_update_holder))
        .route("/scans", post(handle_validate_scan))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Admit Server");

    let catalog: TicketClassCatalog = args.catalog()?;
    let config: EngineConfig = args.engine_config();
    info!(
        ticket_classes = ?args.ticket_classes,
        deferred_confirmation = config.deferred_confirmation,
        request_timeout_ms = args.request_timeout_ms,
        max_batch_size = config.max_batch_size,
        "Engine configured"
    );

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app: Router = build_router(AppState::new(persistence, config, catalog));

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
