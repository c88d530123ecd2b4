// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use admit::{CoreError, RepositoryError};
use admit_domain::DomainError;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The actor could not be established.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor lacks the permission for an operation.
    Unauthorized {
        /// The operation that was attempted.
        action: String,
        /// The permission token that would grant it.
        required_permission: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires permission '{required_permission}'"
                )
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    AuthenticationFailed {
        reason: String,
    },
    /// The actor does not have permission.
    Unauthorized {
        action: String,
        required_permission: String,
    },
    /// A rule about the current state of a resource was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        message: String,
    },
    /// The batch does not fit in the event's remaining capacity.
    CapacityExceeded {
        event_id: i64,
        requested: u32,
        remaining: u32,
    },
    /// Identifiers cannot be generated right now.
    ServiceUnavailable {
        message: String,
    },
    /// The request ran out of time; its effect is unknown.
    Timeout {
        operation: String,
    },
    Internal {
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_permission,
            } => {
                write!(
                    f,
                    "Unauthorized: '{action}' requires permission '{required_permission}'"
                )
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::CapacityExceeded {
                event_id,
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Event {event_id} cannot issue {requested} tickets: only {remaining} remaining"
                )
            }
            Self::ServiceUnavailable { message } => write!(f, "Service unavailable: {message}"),
            Self::Timeout { operation } => {
                write!(f, "Operation '{operation}' timed out; its outcome is unknown")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_permission,
            } => Self::Unauthorized {
                action,
                required_permission,
            },
        }
    }
}

fn invalid_input(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn rule_violation(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidTicketId(_) => invalid_input("ticket_id", message),
        DomainError::MalformedCode(_) => invalid_input("code", message),
        DomainError::UnknownTicketClass { .. } | DomainError::InvalidTicketClass(_) => {
            invalid_input("ticket_class", message)
        }
        DomainError::InvalidHolderName(_) => invalid_input("holder_name", message),
        DomainError::InvalidHolderContact(_) => invalid_input("holder_contact", message),
        DomainError::InvalidPrice(_) => invalid_input("price_minor", message),
        DomainError::InvalidGateId(_) => invalid_input("gate_id", message),
        DomainError::InvalidEventName(_) => invalid_input("name", message),
        DomainError::InvalidCapacity(_) => invalid_input("capacity", message),
        DomainError::InvalidQuantity { .. } => invalid_input("quantity", message),
        DomainError::InvalidEventStatus(_) => invalid_input("status", message),
        DomainError::InvalidStatusTransition { .. } => {
            rule_violation("ticket_lifecycle", message)
        }
        DomainError::InvalidEventTransition { .. } => rule_violation("event_lifecycle", message),
        DomainError::EventNotSelling { .. } => rule_violation("event_not_selling", message),
        DomainError::HolderLocked { .. } => rule_violation("holder_locked", message),
        DomainError::GenerationUnavailable(_) => ApiError::ServiceUnavailable { message },
        DomainError::InvalidTicketStatus(_) | DomainError::InvalidTimestamp(_) => {
            error!(error = %message, "Stored data could not be interpreted");
            ApiError::Internal { message }
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event {event_id} does not exist"),
        },
        CoreError::TicketNotFound(ticket_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {ticket_id} does not exist"),
        },
        CoreError::CapacityExceeded {
            event_id,
            requested,
            remaining,
        } => ApiError::CapacityExceeded {
            event_id,
            requested,
            remaining,
        },
        err @ CoreError::CapacityLocked { .. } => rule_violation("capacity_locked", err.to_string()),
        err @ CoreError::InvalidTransition { .. } => {
            rule_violation("ticket_lifecycle", err.to_string())
        }
        err @ CoreError::InvalidEventTransition { .. } => {
            rule_violation("event_lifecycle", err.to_string())
        }
        CoreError::IssuanceFailed { reason } => ApiError::ServiceUnavailable {
            message: format!("Issuance failed and was rolled back: {reason}"),
        },
        CoreError::GenerationUnavailable(msg) => ApiError::ServiceUnavailable {
            message: format!("Identifier generation unavailable: {msg}"),
        },
        CoreError::Timeout { operation } => ApiError::Timeout {
            operation: operation.to_string(),
        },
        CoreError::Repository(repo_err) => {
            error!(error = %repo_err, "Repository failure");
            ApiError::Internal {
                message: match repo_err {
                    RepositoryError::Storage(_) => String::from("Storage failure"),
                    RepositoryError::InvalidData(_) => String::from("Stored data is invalid"),
                },
            }
        }
    }
}
