//! Check register error types.

use thiserror::Error;
use uuid::Uuid;

use tesoro_shared::AppError;

use super::types::{CheckStatus, MoveAction};
use crate::ledger::ContactKind;

/// Errors that can occur during check lifecycle operations.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// The operation requires at least one attachment (scan of the
    /// physical instrument).
    #[error("At least one attachment is required")]
    AttachmentRequired,

    /// The check has already been settled.
    #[error("Check is already paid")]
    AlreadyPaid,

    /// The requested action is not defined from the check's current
    /// status.
    #[error("Cannot {action:?} a check in status {from:?}")]
    InvalidTransition {
        /// The status the check is in.
        from: CheckStatus,
        /// The action that was attempted.
        action: MoveAction,
    },

    /// The counterparty has the wrong classification for this action.
    #[error("Action {action:?} requires a {expected:?} counterparty")]
    WrongCounterparty {
        /// The action that was attempted.
        action: MoveAction,
        /// The classification the action requires.
        expected: ContactKind,
    },

    /// The check does not exist.
    #[error("Check not found: {0}")]
    NotFound(Uuid),
}

impl InstrumentError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AttachmentRequired => "ATTACHMENT_REQUIRED",
            Self::AlreadyPaid => "ALREADY_PAID",
            Self::InvalidTransition { .. } | Self::WrongCounterparty { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::AlreadyPaid => 409,
            Self::AttachmentRequired
            | Self::InvalidTransition { .. }
            | Self::WrongCounterparty { .. } => 400,
        }
    }
}

impl From<InstrumentError> for AppError {
    fn from(err: InstrumentError) -> Self {
        match &err {
            InstrumentError::NotFound(_) => Self::NotFound(err.to_string()),
            InstrumentError::AlreadyPaid => Self::Conflict(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            InstrumentError::AttachmentRequired.error_code(),
            "ATTACHMENT_REQUIRED"
        );
        assert_eq!(InstrumentError::AlreadyPaid.error_code(), "ALREADY_PAID");
        assert_eq!(
            InstrumentError::InvalidTransition {
                from: CheckStatus::Endorsed,
                action: MoveAction::Out,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            InstrumentError::WrongCounterparty {
                action: MoveAction::In,
                expected: ContactKind::Customer,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            InstrumentError::NotFound(Uuid::nil()).error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_settlement_race_maps_to_conflict() {
        let app: AppError = InstrumentError::AlreadyPaid.into();
        assert_eq!(app.status_code(), 409);
    }
}
