//! Format rules for registry input.
//!
//! Every predicate here is pure. They run on trimmed input before any case
//! normalization, so a failure never reaches the store.

use crate::registry::SwiftCodeInput;

/// Length of a SWIFT/BIC code.
pub const SWIFT_CODE_LEN: usize = 11;

/// Length of an ISO 3166-1 alpha-2 country code.
pub const COUNTRY_CODE_LEN: usize = 2;

/// Suffix marking the headquarters record of an institution.
pub const HEADQUARTER_SUFFIX: &str = "XXX";

/// Number of leading characters shared by a branch family.
pub const BRANCH_PREFIX_LEN: usize = 8;

/// Maximum bank name length.
pub const MAX_BANK_NAME_LEN: usize = 255;

/// Maximum country name length.
pub const MAX_COUNTRY_NAME_LEN: usize = 100;

/// Maximum address length.
pub const MAX_ADDRESS_LEN: usize = 255;

/// Returns true if `s` is exactly 11 ASCII letters or digits.
#[must_use]
pub fn valid_swift_code(s: &str) -> bool {
    s.len() == SWIFT_CODE_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns true if `s` is exactly 2 ASCII letters.
#[must_use]
pub fn valid_country_code(s: &str) -> bool {
    s.len() == COUNTRY_CODE_LEN && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Returns true if `s` is non-empty, at most `max_len` long, and made of
/// letters, digits and spaces.
///
/// The empty string is rejected here too, so the predicate is complete on
/// its own and does not depend on [`missing_fields`] running first.
#[must_use]
pub fn valid_name(s: &str, max_len: usize) -> bool {
    !s.is_empty()
        && s.len() <= max_len
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b' ')
}

/// Returns true if `s` is non-empty, at most `max_len` long, and made of
/// letters, digits, spaces, commas, periods, hyphens and slashes.
///
/// Like [`valid_name`], an empty string is invalid.
#[must_use]
pub fn valid_address(s: &str, max_len: usize) -> bool {
    !s.is_empty()
        && s.len() <= max_len
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b' ' | b',' | b'.' | b'-' | b'/'))
}

/// Returns the wire names of required fields that are absent or empty.
///
/// Order is fixed: `swiftCode`, `bankName`, `countryISO2`, `countryName`,
/// `address`, `isHeadquarter`.
#[must_use]
pub fn missing_fields(input: &SwiftCodeInput) -> Vec<&'static str> {
    let text_fields = [
        ("swiftCode", &input.swift_code),
        ("bankName", &input.bank_name),
        ("countryISO2", &input.country_iso2),
        ("countryName", &input.country_name),
        ("address", &input.address),
    ];

    let mut missing: Vec<&'static str> = text_fields
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect();

    if input.is_headquarter.is_none() {
        missing.push("isHeadquarter");
    }

    missing
}

/// Returns the wire names of descriptive fields whose content is not allowed.
#[must_use]
pub fn content_violations(bank_name: &str, country_name: &str, address: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();

    if !valid_name(bank_name, MAX_BANK_NAME_LEN) {
        violations.push("bankName");
    }
    if !valid_name(country_name, MAX_COUNTRY_NAME_LEN) {
        violations.push("countryName");
    }
    if !valid_address(address, MAX_ADDRESS_LEN) {
        violations.push("address");
    }

    violations
}

/// Returns true if the code carries the headquarters suffix.
#[must_use]
pub fn is_headquarter_code(code: &str) -> bool {
    code.len() == SWIFT_CODE_LEN && code.ends_with(HEADQUARTER_SUFFIX)
}

/// Returns the 8-character prefix identifying the code's branch family.
///
/// Codes shorter than the prefix are returned whole.
#[must_use]
pub fn branch_prefix(code: &str) -> &str {
    code.get(..BRANCH_PREFIX_LEN).unwrap_or(code)
}
