//! Error codes for the QuizArena backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the QuizArena backend API.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,
    /// User is not a participant of the match
    NotAParticipant,
    /// User does not own the transfer leg they tried to execute
    NotLegOwner,

    // Request Validation
    /// Invalid match ID provided
    InvalidMatchId,
    /// Invalid staked asset payload
    InvalidAsset,
    /// Invalid rarity tier
    InvalidRarity,
    /// Staked assets are not of the same rarity tier
    RarityMismatch,
    /// Player tried to join their own match
    SelfJoin,
    /// Match is not in the right phase for this operation
    PhaseMismatch,
    /// Answer does not reference the active question
    QuestionMismatch,
    /// Slot already answered the active question
    DuplicateAnswer,
    /// Wallet address not recorded for this player
    MissingWallet,
    /// Token ID is not transferable
    InvalidTokenId,
    /// No collection configured for the staked asset
    MissingCollection,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Match not found
    MatchNotFound,
    /// Automatch queue entry not found
    QueueEntryNotFound,
    /// Transfer record not found
    TransferNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Match already has two players
    MatchFull,
    /// Transfer leg is already being executed
    TransferInProgress,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// State store error
    StoreError,
    /// State store unavailable
    StoreUnavailable,
    /// State store timeout (gateway timeout)
    StoreTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::NotLegOwner => "NOT_LEG_OWNER",

            // Request Validation
            Self::InvalidMatchId => "INVALID_MATCH_ID",
            Self::InvalidAsset => "INVALID_ASSET",
            Self::InvalidRarity => "INVALID_RARITY",
            Self::RarityMismatch => "RARITY_MISMATCH",
            Self::SelfJoin => "SELF_JOIN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::QuestionMismatch => "QUESTION_MISMATCH",
            Self::DuplicateAnswer => "DUPLICATE_ANSWER",
            Self::MissingWallet => "MISSING_WALLET",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::MissingCollection => "MISSING_COLLECTION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            // Resource Not Found
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::QueueEntryNotFound => "QUEUE_ENTRY_NOT_FOUND",
            Self::TransferNotFound => "TRANSFER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::MatchFull => "MATCH_FULL",
            Self::TransferInProgress => "TRANSFER_IN_PROGRESS",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::StoreError => "STORE_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreTimeout => "STORE_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        // Verify that all error codes produce the expected SCREAMING_SNAKE_CASE strings
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(
            ErrorCode::UnauthorizedMissingBearer.as_str(),
            "UNAUTHORIZED_MISSING_BEARER"
        );
        assert_eq!(
            ErrorCode::UnauthorizedInvalidJwt.as_str(),
            "UNAUTHORIZED_INVALID_JWT"
        );
        assert_eq!(
            ErrorCode::UnauthorizedExpiredJwt.as_str(),
            "UNAUTHORIZED_EXPIRED_JWT"
        );
        assert_eq!(ErrorCode::Forbidden.as_str(), "FORBIDDEN");
        assert_eq!(ErrorCode::NotAParticipant.as_str(), "NOT_A_PARTICIPANT");
        assert_eq!(ErrorCode::NotLegOwner.as_str(), "NOT_LEG_OWNER");
        assert_eq!(ErrorCode::InvalidMatchId.as_str(), "INVALID_MATCH_ID");
        assert_eq!(ErrorCode::InvalidAsset.as_str(), "INVALID_ASSET");
        assert_eq!(ErrorCode::InvalidRarity.as_str(), "INVALID_RARITY");
        assert_eq!(ErrorCode::RarityMismatch.as_str(), "RARITY_MISMATCH");
        assert_eq!(ErrorCode::SelfJoin.as_str(), "SELF_JOIN");
        assert_eq!(ErrorCode::PhaseMismatch.as_str(), "PHASE_MISMATCH");
        assert_eq!(ErrorCode::QuestionMismatch.as_str(), "QUESTION_MISMATCH");
        assert_eq!(ErrorCode::DuplicateAnswer.as_str(), "DUPLICATE_ANSWER");
        assert_eq!(ErrorCode::MissingWallet.as_str(), "MISSING_WALLET");
        assert_eq!(ErrorCode::InvalidTokenId.as_str(), "INVALID_TOKEN_ID");
        assert_eq!(ErrorCode::MissingCollection.as_str(), "MISSING_COLLECTION");
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
        assert_eq!(ErrorCode::MatchNotFound.as_str(), "MATCH_NOT_FOUND");
        assert_eq!(
            ErrorCode::QueueEntryNotFound.as_str(),
            "QUEUE_ENTRY_NOT_FOUND"
        );
        assert_eq!(ErrorCode::TransferNotFound.as_str(), "TRANSFER_NOT_FOUND");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::MatchFull.as_str(), "MATCH_FULL");
        assert_eq!(
            ErrorCode::TransferInProgress.as_str(),
            "TRANSFER_IN_PROGRESS"
        );
        assert_eq!(ErrorCode::OptimisticLock.as_str(), "OPTIMISTIC_LOCK");
        assert_eq!(ErrorCode::Conflict.as_str(), "CONFLICT");
        assert_eq!(ErrorCode::StoreError.as_str(), "STORE_ERROR");
        assert_eq!(ErrorCode::StoreUnavailable.as_str(), "STORE_UNAVAILABLE");
        assert_eq!(ErrorCode::StoreTimeout.as_str(), "STORE_TIMEOUT");
        assert_eq!(ErrorCode::Internal.as_str(), "INTERNAL");
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
        assert_eq!(ErrorCode::DataCorruption.as_str(), "DATA_CORRUPTION");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::Unauthorized), "UNAUTHORIZED");
        assert_eq!(format!("{}", ErrorCode::InvalidMatchId), "INVALID_MATCH_ID");
        assert_eq!(format!("{}", ErrorCode::RarityMismatch), "RARITY_MISMATCH");
        assert_eq!(format!("{}", ErrorCode::OptimisticLock), "OPTIMISTIC_LOCK");
        assert_eq!(
            format!("{}", ErrorCode::StoreUnavailable),
            "STORE_UNAVAILABLE"
        );
    }
}
