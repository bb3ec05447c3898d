// Domain error to HTTP mapping, no database or server involved.
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

fn mapped(err: DomainError) -> (ErrorCode, u16) {
    let app: AppError = err.into();
    (app.code(), app.status().as_u16())
}

#[test]
fn validation_is_422() {
    assert_eq!(
        mapped(DomainError::validation("bad field")),
        (ErrorCode::ValidationError, 422)
    );
}

#[test]
fn conflicts_keep_their_kind() {
    let cases = [
        (ConflictKind::RoundNumberTaken, ErrorCode::RoundNumberTaken),
        (ConflictKind::EditInProgress, ErrorCode::EditInProgress),
        (ConflictKind::StatsInitialized, ErrorCode::StatsInitialized),
        (ConflictKind::Other("x".into()), ErrorCode::Conflict),
    ];
    for (kind, code) in cases {
        assert_eq!(mapped(DomainError::conflict(kind, "c")), (code, 409));
    }
}

#[test]
fn not_found_per_record_type() {
    assert_eq!(
        mapped(DomainError::not_found(NotFoundKind::Score, "s")),
        (ErrorCode::ScoreNotFound, 404)
    );
    assert_eq!(
        mapped(DomainError::not_found(NotFoundKind::PlayerStat, "p")),
        (ErrorCode::PlayerStatNotFound, 404)
    );
    assert_eq!(
        mapped(DomainError::not_found(NotFoundKind::Other("Record".into()), "r")),
        (ErrorCode::NotFound, 404)
    );
}

#[test]
fn infra_failures_are_server_errors() {
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::DbUnavailable, "down")),
        (ErrorCode::DbUnavailable, 503)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::Timeout, "slow")),
        (ErrorCode::DbTimeout, 500)
    );
    assert_eq!(
        mapped(DomainError::infra(InfraErrorKind::Other("DbErr".into()), "?")),
        (ErrorCode::DbError, 500)
    );
}

#[test]
fn detail_survives_mapping() {
    let app: AppError = DomainError::not_found(NotFoundKind::Score, "Score 9 not found").into();
    assert!(app.to_string().contains("Score 9 not found"));
}
