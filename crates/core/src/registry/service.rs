//! Registry facade: validation, then rate limiting, then the store.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::{RegistryError, StoreError};
use super::store::RegistryStore;
use super::types::{
    CountrySwiftCodes, DeleteOutcome, InsertOutcome, NewSwiftCode, SwiftCodeInput, SwiftCodeView,
};
use crate::rate_limit::RateLimiter;
use crate::validation;

/// Entry point for every registry operation.
///
/// Requests that fail validation are rejected before they consume a rate
/// limit token, and rate limited requests never reach the store.
pub struct RegistryService<S: RegistryStore> {
    store: Arc<S>,
    limiter: RateLimiter,
}

impl<S: RegistryStore> RegistryService<S> {
    /// Create a new registry service.
    #[must_use]
    pub fn new(store: Arc<S>, limiter: RateLimiter) -> Self {
        Self { store, limiter }
    }

    /// Returns the limiter guarding this registry.
    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Look up a code, including its branch family if it is a headquarters code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is malformed, the client is rate limited,
    /// or the store fails.
    pub async fn lookup_by_code(
        &self,
        client_id: &str,
        swift_code: &str,
    ) -> Result<Option<SwiftCodeView>, RegistryError> {
        let swift_code = parse_swift_code(swift_code)?;
        self.admit(client_id)?;

        self.store
            .find_by_code(&swift_code)
            .await
            .map_err(|e| store_failure("lookup_by_code", e))
    }

    /// List every code registered under a country.
    ///
    /// A well-formed but unknown country yields an empty listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the country code is malformed, the client is rate
    /// limited, or the store fails.
    pub async fn lookup_by_country(
        &self,
        client_id: &str,
        country_iso2: &str,
    ) -> Result<CountrySwiftCodes, RegistryError> {
        let country_iso2 = parse_country_code(country_iso2)?;
        self.admit(client_id)?;

        let listing = self
            .store
            .find_by_country(&country_iso2)
            .await
            .map_err(|e| store_failure("lookup_by_country", e))?;

        Ok(listing.unwrap_or_else(|| CountrySwiftCodes::empty(country_iso2)))
    }

    /// Register a new code.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing
    /// - The code or country code is malformed
    /// - Names or address break content rules, or the headquarters flag
    ///   disagrees with the code suffix
    /// - The client is rate limited
    /// - The code already exists
    /// - The store fails
    pub async fn insert(&self, client_id: &str, input: SwiftCodeInput) -> Result<(), RegistryError> {
        let record = prepare_insert(input)?;
        self.admit(client_id)?;

        let swift_code = record.swift_code.clone();
        match self
            .store
            .insert(record)
            .await
            .map_err(|e| store_failure("insert", e))?
        {
            InsertOutcome::Created => {
                info!(swift_code = %swift_code, "SWIFT code added");
                Ok(())
            }
            InsertOutcome::Conflict => Err(RegistryError::Conflict(swift_code)),
        }
    }

    /// Delete a code, cascading to its bank and country when they empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is malformed, the client is rate limited,
    /// or the store fails.
    pub async fn delete(
        &self,
        client_id: &str,
        swift_code: &str,
    ) -> Result<DeleteOutcome, RegistryError> {
        let swift_code = parse_swift_code(swift_code)?;
        self.admit(client_id)?;

        let outcome = self
            .store
            .delete(&swift_code)
            .await
            .map_err(|e| store_failure("delete", e))?;

        if outcome == DeleteOutcome::Deleted {
            info!(swift_code = %swift_code, "SWIFT code deleted");
        }

        Ok(outcome)
    }

    fn admit(&self, client_id: &str) -> Result<(), RegistryError> {
        if self.limiter.allow(client_id) {
            Ok(())
        } else {
            warn!(client_id, "Rate limit exceeded");
            Err(RegistryError::RateLimited(client_id.to_string()))
        }
    }
}

fn store_failure(operation: &'static str, err: StoreError) -> RegistryError {
    error!(operation, error = %err, "Registry store failed");
    RegistryError::Store(err)
}

fn parse_swift_code(raw: &str) -> Result<String, RegistryError> {
    let raw = raw.trim();
    if validation::valid_swift_code(raw) {
        Ok(raw.to_ascii_uppercase())
    } else {
        Err(RegistryError::invalid_swift_code())
    }
}

fn parse_country_code(raw: &str) -> Result<String, RegistryError> {
    let raw = raw.trim();
    if validation::valid_country_code(raw) {
        Ok(raw.to_ascii_uppercase())
    } else {
        Err(RegistryError::invalid_country_code())
    }
}

/// Validates and normalizes an insert request.
pub(super) fn prepare_insert(input: SwiftCodeInput) -> Result<NewSwiftCode, RegistryError> {
    let input = input.trimmed();

    let missing = validation::missing_fields(&input);
    if !missing.is_empty() {
        return Err(RegistryError::missing(&missing));
    }
    let (
        Some(swift_code),
        Some(bank_name),
        Some(country_iso2),
        Some(country_name),
        Some(address),
        Some(is_headquarter),
    ) = (
        input.swift_code,
        input.bank_name,
        input.country_iso2,
        input.country_name,
        input.address,
        input.is_headquarter,
    )
    else {
        return Err(RegistryError::missing(&missing));
    };

    if !validation::valid_swift_code(&swift_code) {
        return Err(RegistryError::invalid_swift_code());
    }
    if !validation::valid_country_code(&country_iso2) {
        return Err(RegistryError::invalid_country_code());
    }

    let violations = validation::content_violations(&bank_name, &country_name, &address);
    if !violations.is_empty() {
        return Err(RegistryError::validation(&violations));
    }

    let record = NewSwiftCode {
        swift_code: swift_code.to_ascii_uppercase(),
        bank_name: bank_name.to_ascii_uppercase(),
        country_iso2: country_iso2.to_ascii_uppercase(),
        country_name: country_name.to_ascii_uppercase(),
        address: address.to_ascii_uppercase(),
        is_headquarter,
    };

    if validation::is_headquarter_code(&record.swift_code) != record.is_headquarter {
        return Err(RegistryError::validation(&["isHeadquarter"]));
    }

    Ok(record)
}
