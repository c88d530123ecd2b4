// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Every mutation that reads before it writes runs inside
//! `immediate_transaction`, so the write lock is held from the first read.
//! Conditional updates carry their precondition in the `WHERE` clause and
//! inspect the affected row count.
//!
//! ## Module Organization
//!
//! - `events`: Event creation, status changes and the issued counter
//! - `tickets`: Ticket insertion, status compare-and-set, holder edits and
//!   discards

pub mod events;
pub mod tickets;

pub use events::{
    compare_and_set_event_status, insert_event, release_capacity, reserve_capacity,
    set_event_capacity,
};
pub use tickets::{compare_and_set_status, discard_ticket, insert_ticket, update_holder};
