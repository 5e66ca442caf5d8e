//! Authenticated endpoints backing the catalog's edit screens.
use axum::{Extension, Json, extract::Path};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Genre, Movie, User};
use crate::{SharedState, auth::Authenticated};

/// User record as exposed over HTTP. The password hash stays server side.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Serialize)]
pub struct MovieForEditDto {
    pub movie: Movie,
    pub genres: Vec<Genre>,
}

// GET /admin/me
pub async fn me(Authenticated(user): Authenticated) -> Json<UserDto> {
    Json(user.into())
}

// GET /admin/movies/{id}
pub async fn movie_for_edit(
    Authenticated(_user): Authenticated,
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieForEditDto>, AppError> {
    let (movie, genres) = state.repo.one_movie_for_edit(id).await?;
    Ok(Json(MovieForEditDto { movie, genres }))
}

// GET /admin/users/{id}
pub async fn user_by_id(
    Authenticated(_user): Authenticated,
    Extension(state): Extension<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, AppError> {
    let user = state.repo.get_user_by_id(id).await?;
    Ok(Json(user.into()))
}
