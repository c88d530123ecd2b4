// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket status states and the legal transition table.
//!
//! Status is a closed state machine. Every transition names the state the
//! caller believes the ticket is in; storage applies it only when that
//! belief still holds.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a single ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Issued but awaiting confirmation (deferred confirmation deployments).
    Pending,
    /// Confirmed and admissible.
    Valid,
    /// Admitted at a gate. Terminal.
    Scanned,
    /// Voided before admission. Terminal.
    Cancelled,
}

impl TicketStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Valid => "valid",
            Self::Scanned => "scanned",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Scanned | Self::Cancelled)
    }

    /// Returns true if holder details may still be edited in this status.
    #[must_use]
    pub const fn allows_holder_changes(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks whether `self -> target` is a row of the lifecycle table.
    ///
    /// Legal transitions:
    /// - Pending → Valid (confirmation)
    /// - Pending → Cancelled
    /// - Valid → Scanned (admission)
    /// - Valid → Cancelled
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Valid | Self::Cancelled)
                | (Self::Valid, Self::Scanned | Self::Cancelled)
        )
    }

    /// Validates that a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the pair is not in
    /// the lifecycle table.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "valid" => Ok(Self::Valid),
            "scanned" => Ok(Self::Scanned),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TicketStatus; 4] = [
        TicketStatus::Pending,
        TicketStatus::Valid,
        TicketStatus::Scanned,
        TicketStatus::Cancelled,
    ];

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            let s = status.as_str();
            match TicketStatus::from_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = TicketStatus::from_str("used");
        assert_eq!(
            result,
            Err(DomainError::InvalidTicketStatus(String::from("used")))
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TicketStatus::Pending.is_terminal());
        assert!(!TicketStatus::Valid.is_terminal());
        assert!(TicketStatus::Scanned.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_transition_table_is_exact() {
        let legal = [
            (TicketStatus::Pending, TicketStatus::Valid),
            (TicketStatus::Pending, TicketStatus::Cancelled),
            (TicketStatus::Valid, TicketStatus::Scanned),
            (TicketStatus::Valid, TicketStatus::Cancelled),
        ];

        for from in ALL {
            for to in ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "legal" } else { "illegal" }
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for to in ALL {
            assert!(TicketStatus::Scanned.validate_transition(to).is_err());
            assert!(TicketStatus::Cancelled.validate_transition(to).is_err());
        }
    }

    #[test]
    fn test_scanned_cannot_be_cancelled() {
        assert_eq!(
            TicketStatus::Scanned.validate_transition(TicketStatus::Cancelled),
            Err(DomainError::InvalidStatusTransition {
                from: TicketStatus::Scanned,
                to: TicketStatus::Cancelled,
            })
        );
    }

    #[test]
    fn test_pending_cannot_be_scanned_directly() {
        assert!(
            TicketStatus::Pending
                .validate_transition(TicketStatus::Scanned)
                .is_err()
        );
    }

    #[test]
    fn test_holder_changes_only_before_terminal() {
        assert!(TicketStatus::Pending.allows_holder_changes());
        assert!(TicketStatus::Valid.allows_holder_changes());
        assert!(!TicketStatus::Scanned.allows_holder_changes());
        assert!(!TicketStatus::Cancelled.allows_holder_changes());
    }
}
