//! Registry error types.

use thiserror::Error;

use swiftreg_shared::AppError;

/// Failure reported by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Create a store error from any message.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Registry operation errors.
///
/// "Not found" is not an error: lookups return `None` and deletes return
/// [`DeleteOutcome::NotFound`](super::DeleteOutcome::NotFound).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed code or country code.
    #[error("invalid {field}: {reason}")]
    InvalidFormat {
        /// Wire name of the field.
        field: &'static str,
        /// What the field must look like.
        reason: &'static str,
    },

    /// Required fields are absent or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Fields are well formed but break content rules.
    #[error("validation failed for fields: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// The code is already registered.
    #[error("SWIFT code already exists: {0}")]
    Conflict(String),

    /// The client's token bucket is empty.
    #[error("rate limit exceeded for client {0}")]
    RateLimited(String),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Error for a malformed SWIFT code.
    #[must_use]
    pub const fn invalid_swift_code() -> Self {
        Self::InvalidFormat {
            field: "swiftCode",
            reason: "must be exactly 11 letters or digits",
        }
    }

    /// Error for a malformed country code.
    #[must_use]
    pub const fn invalid_country_code() -> Self {
        Self::InvalidFormat {
            field: "countryISO2",
            reason: "must be exactly 2 letters",
        }
    }

    /// Error listing missing fields.
    #[must_use]
    pub fn missing(fields: &[&str]) -> Self {
        Self::MissingFields(fields.iter().map(ToString::to_string).collect())
    }

    /// Error listing fields that failed content rules.
    #[must_use]
    pub fn validation(fields: &[&str]) -> Self {
        Self::ValidationFailed(fields.iter().map(ToString::to_string).collect())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidFormat { .. } => Self::BadRequest(err.to_string()),
            RegistryError::MissingFields(fields) => Self::Validation {
                message: "Missing required fields".to_string(),
                fields,
            },
            RegistryError::ValidationFailed(fields) => Self::Validation {
                message: "Invalid field values".to_string(),
                fields,
            },
            RegistryError::Conflict(_) => Self::Conflict(err.to_string()),
            RegistryError::RateLimited(_) => Self::TooManyRequests("Too many requests".to_string()),
            RegistryError::Store(e) => Self::Database(e.0),
        }
    }
}
