// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization for service operations.
//!
//! Every operation of [`TicketService`](crate::TicketService) names an
//! [`Operation`] and asks [`PermissionGate::authorize`] before touching the
//! engine. The decision depends only on the actor's [`PermissionSet`].

use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::warn;

use crate::error::AuthError;

/// Token that grants every operation.
pub const WILDCARD_TOKEN: &str = "*";

/// A service operation subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    IssueTickets,
    CancelTicket,
    ValidateScan,
    ViewTickets,
    ManageEvents,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::IssueTickets,
        Self::CancelTicket,
        Self::ValidateScan,
        Self::ViewTickets,
        Self::ManageEvents,
    ];

    /// The permission token that grants this operation.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::IssueTickets => "tickets.issue",
            Self::CancelTicket => "tickets.cancel",
            Self::ValidateScan => "scans.validate",
            Self::ViewTickets => "tickets.view",
            Self::ManageEvents => "events.manage",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// The operations an actor may perform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    superuser: bool,
    granted: BTreeSet<Operation>,
}

impl PermissionSet {
    /// A set granting everything.
    #[must_use]
    pub const fn superuser() -> Self {
        Self {
            superuser: true,
            granted: BTreeSet::new(),
        }
    }

    /// A set granting exactly `operations`.
    #[must_use]
    pub fn of(operations: &[Operation]) -> Self {
        Self {
            superuser: false,
            granted: operations.iter().copied().collect(),
        }
    }

    /// Builds a set from permission tokens such as `tickets.issue` or `*`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if a token is unknown.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for token in tokens {
            let token: &str = token.as_ref().trim();
            if token == WILDCARD_TOKEN {
                set.superuser = true;
                continue;
            }
            let operation: Operation = Operation::ALL
                .into_iter()
                .find(|op| op.token() == token)
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: format!("unknown permission token '{token}'"),
                })?;
            set.granted.insert(operation);
        }
        Ok(set)
    }

    #[must_use]
    pub fn allows(&self, operation: Operation) -> bool {
        self.superuser || self.granted.contains(&operation)
    }

    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.superuser
    }
}

/// Named permission presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Everything.
    Admin,
    /// Runs sales: issues and cancels tickets and manages events.
    Organizer,
    /// Gate staff: validates scans and looks tickets up.
    Gate,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Organizer => "organizer",
            Self::Gate => "gate",
        }
    }

    #[must_use]
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Self::Admin => PermissionSet::superuser(),
            Self::Organizer => PermissionSet::of(&[
                Operation::IssueTickets,
                Operation::CancelTicket,
                Operation::ViewTickets,
                Operation::ManageEvents,
            ]),
            Self::Gate => PermissionSet::of(&[Operation::ValidateScan, Operation::ViewTickets]),
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "organizer" => Ok(Self::Organizer),
            "gate" => Ok(Self::Gate),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("unknown role '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An actor whose identity has been established by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: String,
    pub permissions: PermissionSet,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(id: String, permissions: PermissionSet) -> Self {
        Self { id, permissions }
    }

    #[must_use]
    pub fn with_role(id: &str, role: Role) -> Self {
        Self::new(id.to_string(), role.permissions())
    }

    /// Establishes an actor from an id and a role name, as supplied by the
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the id is blank or the
    /// role is unknown.
    pub fn authenticate(id: &str, role: &str) -> Result<Self, AuthError> {
        let id: &str = Self::require_id(id)?;
        let role: Role = role.parse()?;
        Ok(Self::with_role(id, role))
    }

    /// Establishes an actor from an id and a comma-separated list of
    /// permission tokens. Empty entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the id is blank or a
    /// token is unknown.
    pub fn authenticate_with_permissions(id: &str, tokens: &str) -> Result<Self, AuthError> {
        let id: &str = Self::require_id(id)?;
        let permissions: PermissionSet =
            PermissionSet::from_tokens(tokens.split(',').filter(|t| !t.trim().is_empty()))?;
        Ok(Self::new(id.to_string(), permissions))
    }

    fn require_id(id: &str) -> Result<&str, AuthError> {
        let id: &str = id.trim();
        if id.is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("actor id is required"),
            });
        }
        Ok(id)
    }
}

/// Decides whether an actor may perform an operation.
pub struct PermissionGate;

impl PermissionGate {
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the actor's permissions do not
    /// include `operation`.
    pub fn authorize(actor: &AuthenticatedActor, operation: Operation) -> Result<(), AuthError> {
        if actor.permissions.allows(operation) {
            return Ok(());
        }
        warn!(actor = %actor.id, %operation, "Operation denied");
        Err(AuthError::Unauthorized {
            action: operation.to_string(),
            required_permission: operation.token().to_string(),
        })
    }
}
