//! Persistence seam for the registry.

use std::future::Future;

use super::error::StoreError;
use super::types::{CountrySwiftCodes, DeleteOutcome, InsertOutcome, NewSwiftCode, SwiftCodeView};

/// Transactional record store behind the registry.
///
/// This trait is implemented by the db crate. Every method must apply
/// atomically: an insert or delete either fully happens or leaves no visible
/// trace, and no country or bank row is ever left without a referent.
pub trait RegistryStore: Send + Sync {
    /// Insert a record, creating its country and bank if needed.
    ///
    /// An existing country keeps its stored name. Returns
    /// [`InsertOutcome::Conflict`] without side effects if the code exists.
    fn insert(
        &self,
        record: NewSwiftCode,
    ) -> impl Future<Output = Result<InsertOutcome, StoreError>> + Send;

    /// Look up a record by its upper-cased code.
    ///
    /// Headquarters codes come back with their branch family; other codes
    /// match only non-headquarters records and carry no branch list.
    fn find_by_code(
        &self,
        swift_code: &str,
    ) -> impl Future<Output = Result<Option<SwiftCodeView>, StoreError>> + Send;

    /// List every record under a country, or `None` if no such country row exists.
    fn find_by_country(
        &self,
        country_iso2: &str,
    ) -> impl Future<Output = Result<Option<CountrySwiftCodes>, StoreError>> + Send;

    /// Delete a record and any bank and country it was the last referent of.
    fn delete(
        &self,
        swift_code: &str,
    ) -> impl Future<Output = Result<DeleteOutcome, StoreError>> + Send;
}
