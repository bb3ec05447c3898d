//! Score rows: `/api/scores`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{ApiKey, RecordId};
use crate::repos::scores::{NewScore, Score};
use crate::state::app_state::AppState;
use crate::store::ModelStore;

/// Body of `PUT /api/scores/{id}`. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ScorePatch {
    tsim: Option<i32>,
    jason: Option<i32>,
    wai: Option<i32>,
    mum_soup: Option<i32>,
}

impl ScorePatch {
    fn apply(self, mut score: Score) -> Score {
        score.tsim = self.tsim.unwrap_or(score.tsim);
        score.jason = self.jason.unwrap_or(score.jason);
        score.wai = self.wai.unwrap_or(score.wai);
        score.mum_soup = self.mum_soup.unwrap_or(score.mum_soup);
        score
    }
}

/// GET /api/scores, ordered by round number.
async fn list_scores(_key: ApiKey, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut scores = app_state.store.scores().items().to_vec();
    scores.sort_by_key(|s| s.round_number);
    Ok(HttpResponse::Ok().json(scores))
}

/// POST /api/scores
async fn create_score(
    _key: ApiKey,
    body: web::Json<NewScore>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let created = ModelStore::<Score>::create(app_state.store.as_ref(), body.into_inner()).await?;
    info!(id = created.id, round_number = created.round_number, "score created via http");
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/scores/{id}
async fn update_score(
    _key: ApiKey,
    id: RecordId,
    body: web::Json<ScorePatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let current = app_state
        .store
        .scores()
        .items()
        .iter()
        .find(|s| s.id == id.0)
        .cloned()
        .ok_or_else(|| AppError::not_found(ErrorCode::ScoreNotFound, format!("Score {} not found", id.0)))?;

    let updated =
        ModelStore::<Score>::update(app_state.store.as_ref(), body.into_inner().apply(current)).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/scores/{id}
async fn delete_score(
    _key: ApiKey,
    id: RecordId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    ModelStore::<Score>::delete(app_state.store.as_ref(), id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_scores))
            .route(web::post().to(create_score)),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::put().to(update_score))
            .route(web::delete().to(delete_score)),
    );
}
