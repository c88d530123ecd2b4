// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit_domain::TicketStatus;
use std::time::Duration;

/// Default number of identifiers tried per ticket before a batch fails.
pub const DEFAULT_MAX_IDENTIFIER_ATTEMPTS: u32 = 5;

/// Default ceiling on tickets per issuance batch.
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 500;

/// Default request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Engine tuning shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Issue tickets as `Pending` and require an explicit confirmation.
    pub deferred_confirmation: bool,
    /// Identifier attempts per ticket. Zero is treated as one.
    pub max_identifier_attempts: u32,
    pub max_batch_size: u32,
    /// Budget for a whole request.
    pub request_timeout: Duration,
    /// Fresh budget for undoing a failed batch.
    pub rollback_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deferred_confirmation: false,
            max_identifier_attempts: DEFAULT_MAX_IDENTIFIER_ATTEMPTS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rollback_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Status newly issued tickets start in.
    #[must_use]
    pub const fn initial_status(&self) -> TicketStatus {
        if self.deferred_confirmation {
            TicketStatus::Pending
        } else {
            TicketStatus::Valid
        }
    }

    #[must_use]
    pub const fn identifier_attempts(&self) -> u32 {
        if self.max_identifier_attempts == 0 {
            1
        } else {
            self.max_identifier_attempts
        }
    }
}
