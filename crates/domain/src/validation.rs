// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{HolderInfo, MAX_HOLDER_FIELD_LEN};

/// Validates that a holder's field constraints are met.
///
/// # Arguments
///
/// * `holder` - The holder details to validate
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or longer than the field limit
/// - The contact is empty or longer than the field limit
pub fn validate_holder(holder: &HolderInfo) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if holder.name.is_empty() {
        return Err(DomainError::InvalidHolderName(String::from(
            "Name cannot be empty",
        )));
    }
    if holder.name.chars().count() > MAX_HOLDER_FIELD_LEN {
        return Err(DomainError::InvalidHolderName(format!(
            "Name cannot exceed {MAX_HOLDER_FIELD_LEN} characters"
        )));
    }

    // Rule: contact must not be empty
    if holder.contact.is_empty() {
        return Err(DomainError::InvalidHolderContact(String::from(
            "Contact cannot be empty",
        )));
    }
    if holder.contact.chars().count() > MAX_HOLDER_FIELD_LEN {
        return Err(DomainError::InvalidHolderContact(format!(
            "Contact cannot exceed {MAX_HOLDER_FIELD_LEN} characters"
        )));
    }

    Ok(())
}

/// Validates the size of an issuance batch.
///
/// # Arguments
///
/// * `quantity` - Number of tickets requested
/// * `max` - Largest batch the deployment accepts
///
/// # Errors
///
/// Returns `DomainError::InvalidQuantity` if `quantity` is zero or above `max`.
pub const fn validate_quantity(quantity: u32, max: u32) -> Result<(), DomainError> {
    if quantity == 0 || quantity > max {
        return Err(DomainError::InvalidQuantity { quantity, max });
    }
    Ok(())
}
