//! Player statistics rows: `/api/player-stats`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{ApiKey, RecordId};
use crate::repos::player_stats::{NewPlayerStat, PlayerStat};
use crate::state::app_state::AppState;
use crate::store::ModelStore;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PlayerStatPatch {
    player_name: Option<String>,
    win_by_others: Option<i32>,
    self_drawn: Option<i32>,
    paid_out: Option<i32>,
    special_bonus: Option<i32>,
}

impl PlayerStatPatch {
    fn apply(self, mut stat: PlayerStat) -> Result<PlayerStat, AppError> {
        if let Some(name) = self.player_name {
            stat.player_name = validated_name(&name)?;
        }
        stat.win_by_others = self.win_by_others.unwrap_or(stat.win_by_others);
        stat.self_drawn = self.self_drawn.unwrap_or(stat.self_drawn);
        stat.paid_out = self.paid_out.unwrap_or(stat.paid_out);
        stat.special_bonus = self.special_bonus.unwrap_or(stat.special_bonus);
        Ok(stat)
    }
}

fn validated_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "playerName must not be blank",
        ));
    }
    Ok(name.to_string())
}

async fn list_player_stats(
    _key: ApiKey,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.store.player_stats().items()))
}

async fn create_player_stat(
    _key: ApiKey,
    body: web::Json<NewPlayerStat>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut draft = body.into_inner();
    draft.player_name = validated_name(&draft.player_name)?;
    let created = ModelStore::<PlayerStat>::create(app_state.store.as_ref(), draft).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_player_stat(
    _key: ApiKey,
    id: RecordId,
    body: web::Json<PlayerStatPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let current = app_state
        .store
        .player_stats()
        .items()
        .iter()
        .find(|s| s.id == id.0)
        .cloned()
        .ok_or_else(|| {
            AppError::not_found(
                ErrorCode::PlayerStatNotFound,
                format!("Player stat {} not found", id.0),
            )
        })?;

    let updated =
        ModelStore::<PlayerStat>::update(app_state.store.as_ref(), body.into_inner().apply(current)?)
            .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_player_stat(
    _key: ApiKey,
    id: RecordId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    ModelStore::<PlayerStat>::delete(app_state.store.as_ref(), id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_player_stats))
            .route(web::post().to(create_player_stat)),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::put().to(update_player_stat))
            .route(web::delete().to(delete_player_stat)),
    );
}
