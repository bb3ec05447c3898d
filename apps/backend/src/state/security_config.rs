use std::env;
use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};

use crate::error::AppError;

pub const DEFAULT_API_KEY_TTL_DAYS: i64 = 30;

/// Shared public API key and its validity window.
///
/// Only a blake3 digest of the key is kept; comparisons go through
/// `blake3::Hash`'s constant-time equality.
#[derive(Clone)]
pub struct SecurityConfig {
    api_key_digest: blake3::Hash,
    issued_at: OffsetDateTime,
    ttl_days: i64,
    expires_at: OffsetDateTime,
}

/// `issued_at + ttl_days`, or `None` when that falls outside the calendar
/// `time` can represent.
fn expiry(issued_at: OffsetDateTime, ttl_days: i64) -> Option<OffsetDateTime> {
    let seconds = ttl_days.checked_mul(86_400)?;
    issued_at.checked_add(Duration::seconds(seconds))
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("api_key", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("ttl_days", &self.ttl_days)
            .finish()
    }
}

impl SecurityConfig {
    /// An expiry past the representable range is clamped to the last
    /// representable date; `from_env` refuses such windows outright.
    pub fn new(api_key: &str, issued_at: OffsetDateTime, ttl_days: i64) -> Self {
        let expires_at = expiry(issued_at, ttl_days)
            .unwrap_or_else(|| Date::MAX.midnight().assume_utc());
        Self {
            api_key_digest: blake3::hash(api_key.as_bytes()),
            issued_at,
            ttl_days,
            expires_at,
        }
    }

    /// `SCOREBOARD_API_KEY` (required), `SCOREBOARD_API_KEY_ISSUED_AT`
    /// (RFC 3339, default now), `SCOREBOARD_API_KEY_TTL_DAYS` (default 30).
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("SCOREBOARD_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("SCOREBOARD_API_KEY must be set"))?;

        let issued_at = match env::var("SCOREBOARD_API_KEY_ISSUED_AT") {
            Ok(raw) => OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|e| {
                AppError::config(format!("SCOREBOARD_API_KEY_ISSUED_AT is not RFC 3339: {e}"))
            })?,
            Err(_) => OffsetDateTime::now_utc(),
        };

        let ttl_days = match env::var("SCOREBOARD_API_KEY_TTL_DAYS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(AppError::config(format!(
                        "SCOREBOARD_API_KEY_TTL_DAYS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            Err(_) => DEFAULT_API_KEY_TTL_DAYS,
        };
        if expiry(issued_at, ttl_days).is_none() {
            return Err(AppError::config(format!(
                "SCOREBOARD_API_KEY_TTL_DAYS={ttl_days} puts the expiry out of range"
            )));
        }

        Ok(Self::new(&api_key, issued_at, ttl_days))
    }

    pub fn expires_at(&self) -> OffsetDateTime {
        self.expires_at
    }

    /// Check a presented key at `now`.
    pub fn verify(&self, presented: Option<&str>, now: OffsetDateTime) -> Result<(), AppError> {
        let presented = presented
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AppError::UnauthorizedMissingApiKey)?;

        if blake3::hash(presented.as_bytes()) != self.api_key_digest {
            return Err(AppError::UnauthorizedInvalidApiKey);
        }
        if now >= self.expires_at {
            return Err(AppError::UnauthorizedExpiredApiKey);
        }
        Ok(())
    }

    /// Random key issued now, for tests.
    pub fn for_tests() -> (Self, String) {
        let key = uuid::Uuid::new_v4().simple().to_string();
        let config = Self::new(&key, OffsetDateTime::now_utc(), DEFAULT_API_KEY_TTL_DAYS);
        (config, key)
    }
}
