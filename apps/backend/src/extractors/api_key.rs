use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the current public API key.
///
/// The key is read from `x-api-key`; websocket upgrades may instead pass
/// `?api_key=` since browsers cannot set headers on them.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

/// Result of the key check, left in the request extensions for the
/// completion log and recorded on the request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyOutcome {
    Accepted,
    Missing,
    Invalid,
    Expired,
}

impl ApiKeyOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Missing => "missing",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }

    fn of(result: &Result<(), AppError>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(AppError::UnauthorizedMissingApiKey) => Self::Missing,
            Err(AppError::UnauthorizedExpiredApiKey) => Self::Expired,
            Err(_) => Self::Invalid,
        }
    }
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

fn is_websocket_upgrade(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

fn presented_key(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get(API_KEY_HEADER) {
        return value.to_str().ok().map(str::to_string);
    }
    if is_websocket_upgrade(req) {
        return web::Query::<ApiKeyQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().api_key);
    }
    None
}

impl FromRequest for ApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::internal("AppState not configured")));
        };

        let presented = presented_key(req);
        let checked = state
            .security
            .verify(presented.as_deref(), OffsetDateTime::now_utc());
        let outcome = ApiKeyOutcome::of(&checked);
        tracing::Span::current().record("api_key", outcome.as_str());
        req.extensions_mut().insert(outcome);
        if let Err(err) = &checked {
            tracing::debug!(code = %err.code(), path = req.path(), "api key rejected");
        }
        ready(checked.map(|()| ApiKey))
    }
}
