//! The storage-facing contract the API layer depends on.
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::error::RepoError;
use crate::models::{Genre, Movie, User};

/// Read access to the movie catalog and its users.
///
/// Every call is bounded by the implementation's query timeout and fails with
/// [`RepoError::Timeout`] once it elapses.
#[async_trait]
pub trait DatabaseRepo: Send + Sync {
    /// The pool backing this repository. Lifecycle stays with the caller.
    fn connection(&self) -> &SqlitePool;

    /// All movies ordered by title. Genres are not loaded.
    async fn all_movies(&self) -> Result<Vec<Movie>, RepoError>;

    /// One movie with its genres ordered by name.
    async fn one_movie(&self, id: i64) -> Result<Movie, RepoError>;

    /// One movie with its genres and `genres_array` filled in, plus the whole
    /// genre catalog ordered by name.
    async fn one_movie_for_edit(&self, id: i64) -> Result<(Movie, Vec<Genre>), RepoError>;

    /// Exact, case-sensitive email match.
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError>;

    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError>;
}
