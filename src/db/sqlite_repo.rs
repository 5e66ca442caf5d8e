//! SQLite implementation of [`DatabaseRepo`].
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::error::RepoError;
use super::repository::DatabaseRepo;
use crate::models::{Genre, Movie, User};

/// Deadline applied to every repository call unless overridden.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

const SELECT_MOVIE_BY_ID: &str = r#"
    SELECT
        id,
        title,
        release_date,
        runtime,
        mpaa_rating,
        description,
        coalesce(image, '') AS image,
        created_at,
        updated_at
    FROM movies
    WHERE id = ?
"#;

const SELECT_GENRES_FOR_MOVIE: &str = r#"
    SELECT g.id AS id, g.genre AS genre
    FROM movies_genres mg
    LEFT JOIN genres g ON (mg.genre_id = g.id)
    WHERE mg.movie_id = ?
    ORDER BY g.genre
"#;

const SELECT_USER_BY_EMAIL: &str = r#"
    SELECT id, email, first_name, last_name, password, created_at, updated_at
    FROM users
    WHERE email = ?
"#;

const SELECT_USER_BY_ID: &str = r#"
    SELECT id, email, first_name, last_name, password, created_at, updated_at
    FROM users
    WHERE id = ?
"#;

/// Row of the genre join. A link whose genre row is gone comes back as NULLs.
#[derive(sqlx::FromRow)]
struct GenreLinkRow {
    id: Option<i64>,
    genre: Option<String>,
}

impl TryFrom<GenreLinkRow> for Genre {
    type Error = RepoError;

    fn try_from(row: GenreLinkRow) -> Result<Self, Self::Error> {
        match (row.id, row.genre) {
            (Some(id), Some(genre)) => Ok(Genre { id, genre }),
            (None, _) => Err(RepoError::Scan(sqlx::Error::ColumnDecode {
                index: "id".into(),
                source: "movie links to a missing genre".into(),
            })),
            (_, None) => Err(RepoError::Scan(sqlx::Error::ColumnDecode {
                index: "genre".into(),
                source: "genre name is NULL".into(),
            })),
        }
    }
}

/// Repository over a shared SQLite pool. The pool is built once at startup and
/// handed in; cloning the repository shares it.
#[derive(Clone)]
pub struct SqliteDbRepo {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteDbRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run `fut` under this repository's deadline. Dropping the future on
    /// expiry aborts whatever query it was waiting on.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(RepoError::Timeout(self.timeout)),
        }
    }

    async fn fetch_movie(&self, id: i64) -> Result<Movie, RepoError> {
        let movie = sqlx::query_as::<_, Movie>(SELECT_MOVIE_BY_ID)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn fetch_movie_genres(&self, id: i64) -> Result<Vec<Genre>, RepoError> {
        let rows = sqlx::query_as::<_, GenreLinkRow>(SELECT_GENRES_FOR_MOVIE)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Genre::try_from).collect()
    }
}

#[async_trait]
impl DatabaseRepo for SqliteDbRepo {
    fn connection(&self) -> &SqlitePool {
        &self.pool
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn all_movies(&self) -> Result<Vec<Movie>, RepoError> {
        self.bounded(async {
            let movies = sqlx::query_as::<_, Movie>(
                r#"
                SELECT
                    id,
                    title,
                    release_date,
                    runtime,
                    mpaa_rating,
                    description,
                    coalesce(image, '') AS image,
                    created_at,
                    updated_at
                FROM movies
                ORDER BY title
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(movies)
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn one_movie(&self, id: i64) -> Result<Movie, RepoError> {
        self.bounded(async {
            let mut movie = self.fetch_movie(id).await?;
            movie.genres = self.fetch_movie_genres(id).await?;
            Ok(movie)
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn one_movie_for_edit(&self, id: i64) -> Result<(Movie, Vec<Genre>), RepoError> {
        self.bounded(async {
            let mut movie = self.fetch_movie(id).await?;

            let genres = self.fetch_movie_genres(id).await?;
            movie.genres_array = genres.iter().map(|g| g.id).collect();
            movie.genres = genres;

            let all_genres =
                sqlx::query_as::<_, Genre>("SELECT id, genre FROM genres ORDER BY genre")
                    .fetch_all(&self.pool)
                    .await?;

            Ok((movie, all_genres))
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip(self, email))]
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError> {
        self.bounded(async {
            let user = sqlx::query_as::<_, User>(SELECT_USER_BY_EMAIL)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
            Ok(user)
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError> {
        self.bounded(async {
            let user = sqlx::query_as::<_, User>(SELECT_USER_BY_ID)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
            Ok(user)
        })
        .await
    }
}
