//! Public catalog endpoints.
use axum::{Extension, Json, extract::Path};
use serde::Serialize;

use crate::SharedState;
use crate::error::AppError;
use crate::models::Movie;

#[derive(Serialize)]
pub struct StatusDto {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn home() -> Json<StatusDto> {
    Json(StatusDto {
        status: "active",
        message: "Movie catalog up and running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Round-trip to the database through the repository's pool.
pub async fn health(
    Extension(state): Extension<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ping = sqlx::query("SELECT 1").execute(state.repo.connection());

    tokio::time::timeout(state.config.query_timeout, ping)
        .await
        .map_err(|_| AppError::Timeout)?
        .map_err(AppError::internal)?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

// GET /movies
pub async fn all_movies(
    Extension(state): Extension<SharedState>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = state.repo.all_movies().await?;
    Ok(Json(movies))
}

// GET /movies/{id}
pub async fn one_movie(
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>, AppError> {
    let movie = state.repo.one_movie(id).await?;
    Ok(Json(movie))
}
