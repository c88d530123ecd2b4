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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod event;
mod identifier;
mod ticket;
mod ticket_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use event::{Event, EventStatus, NewEvent, validate_capacity};
pub use identifier::{
    EntropySource, OsEntropy, ScanCode, TICKET_ID_LEN, TicketId, TicketIdGenerator,
    decode_scan_code, qr_payload,
};
pub use ticket::{ScanRecord, Ticket, TicketTemplate};
pub use ticket_status::TicketStatus;
pub use types::{
    GateId, HolderInfo, MAX_GATE_ID_LEN, MAX_HOLDER_FIELD_LEN, Price, TicketClass,
    TicketClassCatalog,
};
pub use validation::{validate_holder, validate_quantity};
