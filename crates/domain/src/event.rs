// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Events and their organizer-driven lifecycle.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle of an event.
///
/// Events move forward only. Tickets may be issued while an event is
/// `Selling` or `Active` (door sales); gates admit only while `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Created, not yet on sale. Capacity may still change.
    #[default]
    Draft,
    /// Tickets on sale; gates closed.
    Selling,
    /// Doors open; gates admitting.
    Active,
    /// Event over. No issuance, no admission.
    Closed,
}

impl EventStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Selling => "selling",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Draft → Selling
    /// - Selling → Active
    /// - Active → Closed
    /// - Draft → Closed and Selling → Closed (event abandoned)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Selling | Self::Closed)
                | (Self::Selling, Self::Active | Self::Closed)
                | (Self::Active, Self::Closed)
        )
    }

    /// Returns whether tickets may be issued against the event.
    #[must_use]
    pub const fn allows_issuance(&self) -> bool {
        matches!(self, Self::Selling | Self::Active)
    }

    /// Returns whether gates may admit ticket holders.
    #[must_use]
    pub const fn admits_entry(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "selling" => Ok(Self::Selling),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidEventStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ticketed event.
///
/// `issued` is maintained by storage through an atomic
/// increment-and-check and never exceeds `capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The storage-assigned identifier.
    pub event_id: i64,
    /// Display name.
    pub name: String,
    /// Maximum number of tickets that may ever be issued.
    pub capacity: u32,
    /// Number of tickets issued so far.
    pub issued: u32,
    /// Current lifecycle status.
    pub status: EventStatus,
    /// When the event was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Event {
    /// Returns how many tickets can still be issued.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.issued)
    }

    /// Validates that the event currently accepts ticket sales.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EventNotSelling` if the status forbids issuance.
    pub const fn ensure_selling(&self) -> Result<(), DomainError> {
        if self.status.allows_issuance() {
            Ok(())
        } else {
            Err(DomainError::EventNotSelling {
                event_id: self.event_id,
                status: self.status,
            })
        }
    }
}

/// An event that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Display name.
    pub name: String,
    /// Maximum number of tickets.
    pub capacity: u32,
}

impl NewEvent {
    /// Creates and validates a new event definition.
    ///
    /// The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the capacity is zero.
    pub fn new(name: &str, capacity: u32) -> Result<Self, DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidEventName(String::from(
                "Event name cannot be empty",
            )));
        }
        validate_capacity(capacity)?;
        Ok(Self {
            name: name.to_string(),
            capacity,
        })
    }
}

/// Validates an event capacity.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` if the capacity is zero.
pub const fn validate_capacity(capacity: u32) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(DomainError::InvalidCapacity(capacity));
    }
    Ok(())
}
