//! SWIFT code registry.
//!
//! Countries and banks exist only as parents of code records: they are
//! created when the first record needing them is inserted and removed when
//! the last such record is deleted. The store enforces that model; the
//! service validates and rate limits requests before reaching it.

mod error;
mod service;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, StoreError};
pub use service::RegistryService;
pub use store::RegistryStore;
pub use types::{
    CountrySwiftCodes, DeleteOutcome, InsertOutcome, NewSwiftCode, SwiftCodeDetails,
    SwiftCodeInput, SwiftCodeView,
};
