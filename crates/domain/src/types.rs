// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum length of a gate identifier.
pub const MAX_GATE_ID_LEN: usize = 64;

/// Maximum length of holder name and contact fields.
pub const MAX_HOLDER_FIELD_LEN: usize = 200;

/// Represents a ticket class such as VIP or General.
///
/// Ticket classes are an open set configured per deployment. Values are
/// normalized to uppercase; use [`TicketClassCatalog::resolve`] to obtain
/// one that the deployment accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketClass(String);

impl TicketClass {
    /// Returns the normalized class name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a value read back from storage.
    ///
    /// Stored classes were validated when the ticket was issued, so they are
    /// not checked against the current catalog.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self(value.to_uppercase())
    }
}

impl std::fmt::Display for TicketClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of ticket classes a deployment accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketClassCatalog {
    classes: BTreeSet<String>,
}

impl Default for TicketClassCatalog {
    fn default() -> Self {
        Self {
            classes: ["VIP", "GENERAL", "STUDENT"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl TicketClassCatalog {
    /// Builds a catalog from configured class names.
    ///
    /// Names are trimmed and uppercased; duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns an error if no classes are given or a name is empty or
    /// contains characters other than letters, digits, `-` and `_`.
    pub fn new<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: BTreeSet<String> = BTreeSet::new();
        for name in names {
            let name: String = name.as_ref().trim().to_uppercase();
            if name.is_empty() {
                return Err(DomainError::InvalidTicketClass(String::from(
                    "Ticket class names cannot be empty",
                )));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(DomainError::InvalidTicketClass(format!(
                    "'{name}' may only contain letters, digits, '-' and '_'"
                )));
            }
            classes.insert(name);
        }
        if classes.is_empty() {
            return Err(DomainError::InvalidTicketClass(String::from(
                "At least one ticket class must be configured",
            )));
        }
        Ok(Self { classes })
    }

    /// Resolves a requested class name against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTicketClass` if the class is not configured.
    pub fn resolve(&self, requested: &str) -> Result<TicketClass, DomainError> {
        let normalized: String = requested.trim().to_uppercase();
        if self.classes.contains(&normalized) {
            Ok(TicketClass(normalized))
        } else {
            Err(DomainError::UnknownTicketClass {
                class: requested.to_string(),
                allowed: self.classes.iter().cloned().collect(),
            })
        }
    }

    /// Returns the configured class names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

/// A ticket price in minor currency units (e.g. cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Creates a validated price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the amount is negative.
    pub const fn new(minor_units: i64) -> Result<Self, DomainError> {
        if minor_units < 0 {
            return Err(DomainError::InvalidPrice(minor_units));
        }
        Ok(Self(minor_units))
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }
}

/// Identifies the physical or logical entry point a scan came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(String);

impl GateId {
    /// Creates a validated gate identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, too long, or contains
    /// whitespace or control characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value: &str = value.trim();
        if value.is_empty() {
            return Err(DomainError::InvalidGateId(String::from(
                "Gate id cannot be empty",
            )));
        }
        if value.len() > MAX_GATE_ID_LEN {
            return Err(DomainError::InvalidGateId(format!(
                "Gate id cannot exceed {MAX_GATE_ID_LEN} characters"
            )));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidGateId(String::from(
                "Gate id cannot contain whitespace",
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the gate identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a ticket is issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderInfo {
    /// The holder's name as printed on the ticket.
    pub name: String,
    /// Email address or phone number.
    pub contact: String,
}

impl HolderInfo {
    /// Creates holder details. Fields are trimmed but not validated.
    #[must_use]
    pub fn new(name: &str, contact: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            contact: contact.trim().to_string(),
        }
    }
}
