//! Registry domain types.

use serde::{Deserialize, Serialize};

/// Raw insert request as received from a client.
///
/// Every field is optional so that absent fields can be reported together
/// instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SwiftCodeInput {
    /// SWIFT/BIC code.
    pub swift_code: Option<String>,
    /// Owning bank name.
    pub bank_name: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(rename = "countryISO2")]
    pub country_iso2: Option<String>,
    /// Country display name.
    pub country_name: Option<String>,
    /// Branch or headquarters address.
    pub address: Option<String>,
    /// Whether the record is the institution's headquarters.
    pub is_headquarter: Option<bool>,
}

impl SwiftCodeInput {
    /// Returns the input with surrounding whitespace removed from every text field.
    #[must_use]
    pub fn trimmed(self) -> Self {
        fn trim(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string())
        }

        Self {
            swift_code: trim(self.swift_code),
            bank_name: trim(self.bank_name),
            country_iso2: trim(self.country_iso2),
            country_name: trim(self.country_name),
            address: trim(self.address),
            is_headquarter: self.is_headquarter,
        }
    }
}

/// A validated, upper-cased record ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSwiftCode {
    /// SWIFT/BIC code.
    pub swift_code: String,
    /// Owning bank name.
    pub bank_name: String,
    /// Country code.
    pub country_iso2: String,
    /// Country display name, used only if the country is new.
    pub country_name: String,
    /// Address.
    pub address: String,
    /// Headquarters flag, consistent with the code suffix.
    pub is_headquarter: bool,
}

/// Summary of a code record, used for branch lists and country listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCodeDetails {
    /// Address.
    pub address: String,
    /// Owning bank name.
    pub bank_name: String,
    /// Country code.
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    /// Headquarters flag as stored.
    pub is_headquarter: bool,
    /// SWIFT/BIC code.
    pub swift_code: String,
}

/// Full view of a single code record.
///
/// `branches` is present only for headquarters lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCodeView {
    /// Address.
    pub address: String,
    /// Owning bank name.
    pub bank_name: String,
    /// Country code.
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    /// Country display name.
    pub country_name: String,
    /// Headquarters flag.
    pub is_headquarter: bool,
    /// SWIFT/BIC code.
    pub swift_code: String,
    /// Branch family of a headquarters record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<SwiftCodeDetails>>,
}

impl SwiftCodeView {
    /// Returns the summary form of this record.
    #[must_use]
    pub fn details(&self) -> SwiftCodeDetails {
        SwiftCodeDetails {
            address: self.address.clone(),
            bank_name: self.bank_name.clone(),
            country_iso2: self.country_iso2.clone(),
            is_headquarter: self.is_headquarter,
            swift_code: self.swift_code.clone(),
        }
    }
}

/// All codes registered under one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySwiftCodes {
    /// Country code.
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    /// Country display name; empty if the country is unknown.
    pub country_name: String,
    /// Codes of every bank in the country, ordered by code.
    pub swift_codes: Vec<SwiftCodeDetails>,
}

impl CountrySwiftCodes {
    /// Returns the listing for a country with no stored row.
    #[must_use]
    pub fn empty(country_iso2: impl Into<String>) -> Self {
        Self {
            country_iso2: country_iso2.into(),
            country_name: String::new(),
            swift_codes: Vec::new(),
        }
    }
}

/// Result of a store insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was created.
    Created,
    /// A record with the same code already exists; nothing changed.
    Conflict,
}

/// Result of a store delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record (and any parents it alone referenced) was removed.
    Deleted,
    /// No record with that code exists.
    NotFound,
}
