use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    types::{Deleted, Film, FilmPatch, NewFilm},
    Db,
};

/// Ids that do not parse cannot name a stored film, so they are reported as
/// missing rather than malformed.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "message": "filmtrack API is up" }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "route not found" })),
    )
}

pub async fn list_films(State(db): State<Db>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(db.list_all().await?))
}

pub async fn get_film(State(db): State<Db>, Path(id): Path<String>) -> AppResult<Json<Film>> {
    let id = parse_id(&id)?;
    Ok(Json(db.get_by_id(id).await?))
}

pub async fn create_film(
    State(db): State<Db>,
    payload: Result<Json<NewFilm>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Film>)> {
    let Json(input) = payload?;
    let film = db.create(input).await?;
    info!(id = %film.id, "created film");
    Ok((StatusCode::CREATED, Json(film)))
}

pub async fn update_film(
    State(db): State<Db>,
    Path(id): Path<String>,
    payload: Result<Json<FilmPatch>, JsonRejection>,
) -> AppResult<Json<Film>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    Ok(Json(db.update_by_id(id, patch).await?))
}

pub async fn delete_film(State(db): State<Db>, Path(id): Path<String>) -> AppResult<Json<Deleted>> {
    let id = parse_id(&id)?;
    let film = db.delete_by_id(id).await?;
    info!(%id, "deleted film");
    Ok(Json(Deleted {
        message: "film deleted".to_string(),
        deleted_record: film,
    }))
}
