//! Ledger error types for validation failures.
//!
//! Every failure is detected before any write and carries enough detail
//! for the request layer to render a field-level message.

use thiserror::Error;
use uuid::Uuid;

use tesoro_shared::types::AmountError;
use tesoro_shared::AppError;

/// Errors that can occur while resolving a ledger operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller-supplied amount was non-positive, unparsable, or carried
    /// sub-cent precision.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// A POS operation was missing the field its mode requires.
    #[error("Missing POS field: {0}")]
    MissingPosField(&'static str),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (bank account, card, contact, check).
        entity: &'static str,
        /// The id that failed to resolve.
        id: Uuid,
    },

    /// A referenced entity exists but is disabled.
    #[error("{entity} {id} is inactive")]
    InactiveReference {
        /// Entity kind.
        entity: &'static str,
        /// The disabled entity's id.
        id: Uuid,
    },

    /// Generic field-level rejection.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::MissingPosField(_) => "MISSING_POS_FIELD",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InactiveReference { .. } => "INACTIVE_REFERENCE",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidAmount(_)
            | Self::MissingPosField(_)
            | Self::InactiveReference { .. }
            | Self::ValidationFailed(_) => 400,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::NotFound { .. } => Self::NotFound(err.to_string()),
            LedgerError::InactiveReference { .. } => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::MissingPosField("net").error_code(),
            "MISSING_POS_FIELD"
        );
        assert_eq!(
            LedgerError::NotFound {
                entity: "bank account",
                id: Uuid::nil(),
            }
            .error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            LedgerError::InactiveReference {
                entity: "card",
                id: Uuid::nil(),
            }
            .error_code(),
            "INACTIVE_REFERENCE"
        );
        assert_eq!(
            LedgerError::ValidationFailed(String::new()).error_code(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            LedgerError::NotFound {
                entity: "contact",
                id: Uuid::nil(),
            }
            .http_status_code(),
            404
        );
        assert_eq!(LedgerError::MissingPosField("gross").http_status_code(), 400);
    }

    #[test]
    fn test_into_app_error() {
        let err = LedgerError::NotFound {
            entity: "check",
            id: Uuid::nil(),
        };
        let app: AppError = err.into();
        assert_eq!(app.status_code(), 404);

        let err = LedgerError::MissingPosField("commission");
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
