// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, HolderInfo, MAX_HOLDER_FIELD_LEN, validate_holder, validate_quantity};

#[test]
fn test_valid_holder_passes() {
    let holder = HolderInfo::new("Grace Hopper", "+1 555 0100");
    assert!(validate_holder(&holder).is_ok());
}

#[test]
fn test_holder_fields_are_trimmed() {
    let holder = HolderInfo::new("  Grace Hopper  ", " grace@example.com ");
    assert_eq!(holder.name, "Grace Hopper");
    assert_eq!(holder.contact, "grace@example.com");
}

#[test]
fn test_empty_name_fails() {
    let holder = HolderInfo::new("   ", "grace@example.com");
    assert!(matches!(
        validate_holder(&holder),
        Err(DomainError::InvalidHolderName(_))
    ));
}

#[test]
fn test_empty_contact_fails() {
    let holder = HolderInfo::new("Grace Hopper", "");
    assert!(matches!(
        validate_holder(&holder),
        Err(DomainError::InvalidHolderContact(_))
    ));
}

#[test]
fn test_overlong_fields_fail() {
    let long = "x".repeat(MAX_HOLDER_FIELD_LEN + 1);
    assert!(validate_holder(&HolderInfo::new(&long, "a@b.c")).is_err());
    assert!(validate_holder(&HolderInfo::new("Grace", &long)).is_err());
}

#[test]
fn test_quantity_bounds() {
    assert!(validate_quantity(1, 500).is_ok());
    assert!(validate_quantity(500, 500).is_ok());
    assert_eq!(
        validate_quantity(0, 500),
        Err(DomainError::InvalidQuantity {
            quantity: 0,
            max: 500
        })
    );
    assert!(validate_quantity(501, 500).is_err());
}
