//! Error codes for the scoreboard API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authorization
    /// Authentication required
    Unauthorized,
    /// No `x-api-key` header or `api_key` query parameter
    UnauthorizedMissingApiKey,
    /// Presented key does not match the configured key
    UnauthorizedInvalidApiKey,
    /// Configured key is past its expiry window
    UnauthorizedExpiredApiKey,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Path id is not a valid record id
    InvalidRecordId,

    // Resource Not Found
    /// Score row not found
    ScoreNotFound,
    /// Player statistic row not found
    PlayerStatNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Round number already used by another row
    RoundNumberTaken,
    /// Another row is already being edited
    EditInProgress,
    /// Player statistics already initialized
    StatsInitialized,
    /// Generic conflict
    Conflict,
    /// Unique constraint violation
    UniqueViolation,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingApiKey => "UNAUTHORIZED_MISSING_API_KEY",
            Self::UnauthorizedInvalidApiKey => "UNAUTHORIZED_INVALID_API_KEY",
            Self::UnauthorizedExpiredApiKey => "UNAUTHORIZED_EXPIRED_API_KEY",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidRecordId => "INVALID_RECORD_ID",

            Self::ScoreNotFound => "SCORE_NOT_FOUND",
            Self::PlayerStatNotFound => "PLAYER_STAT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoundNumberTaken => "ROUND_NUMBER_TAKEN",
            Self::EditInProgress => "EDIT_IN_PROGRESS",
            Self::StatsInitialized => "STATS_INITIALIZED",
            Self::Conflict => "CONFLICT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 20] = [
        Self::Unauthorized,
        Self::UnauthorizedMissingApiKey,
        Self::UnauthorizedInvalidApiKey,
        Self::UnauthorizedExpiredApiKey,
        Self::ValidationError,
        Self::BadRequest,
        Self::InvalidRecordId,
        Self::ScoreNotFound,
        Self::PlayerStatNotFound,
        Self::NotFound,
        Self::RoundNumberTaken,
        Self::EditInProgress,
        Self::StatsInitialized,
        Self::Conflict,
        Self::UniqueViolation,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
