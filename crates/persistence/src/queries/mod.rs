// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `events`: Event lookup and listing
//! - `tickets`: Ticket lookup, per-event listing and status history

pub mod events;
pub mod tickets;

pub use events::{find_event, list_events};
pub use tickets::{find_ticket, list_ticket_history, list_tickets_for_event};
