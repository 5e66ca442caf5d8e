pub mod error;
pub mod repository;
pub mod sqlite_repo;

pub use error::RepoError;
pub use repository::DatabaseRepo;
pub use sqlite_repo::{DEFAULT_QUERY_TIMEOUT, SqliteDbRepo};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type Db = SqlitePool;

/// Open the pool over an existing catalog database. The schema is managed
/// outside this crate (see `schema.sql`).
pub async fn init_db(path: &std::path::Path, max_connections: u32) -> anyhow::Result<Db> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .foreign_keys(true)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, TimeZone, Utc};
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Fresh in-memory database with the catalog schema loaded.
    ///
    /// Each `:memory:` connection is its own database, so the pool is capped at one.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(include_str!("../../schema.sql"))
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    /// Movies 1 "Inception", 2 "Zodiac", 3 "Amelie" (no image) and four genres.
    /// Inception links Thriller before Sci-Fi so ordering has to come from the query.
    pub async fn seed_catalog(pool: &SqlitePool) {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        let movies = [
            (1, "Inception", (2010, 7, 16), 148, "PG-13", Some("/inception.jpg")),
            (2, "Zodiac", (2007, 3, 2), 157, "R", Some("/zodiac.jpg")),
            (3, "Amelie", (2001, 4, 25), 122, "R", None),
        ];
        for (id, title, (y, m, d), runtime, rating, image) in movies {
            sqlx::query(
                "INSERT INTO movies (id, title, release_date, runtime, mpaa_rating, description, image, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id as i64)
            .bind(title)
            .bind(NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .bind(runtime as i64)
            .bind(rating)
            .bind(format!("About {title}"))
            .bind(image)
            .bind(ts)
            .bind(ts)
            .execute(pool)
            .await
            .unwrap();
        }

        for (id, name) in [(1, "Sci-Fi"), (2, "Thriller"), (3, "Comedy"), (4, "Drama")] {
            sqlx::query("INSERT INTO genres (id, genre) VALUES (?, ?)")
                .bind(id as i64)
                .bind(name)
                .execute(pool)
                .await
                .unwrap();
        }

        for (movie_id, genre_id) in [(1, 2), (1, 1), (3, 4), (3, 3)] {
            sqlx::query("INSERT INTO movies_genres (movie_id, genre_id) VALUES (?, ?)")
                .bind(movie_id as i64)
                .bind(genre_id as i64)
                .execute(pool)
                .await
                .unwrap();
        }
    }

    /// Insert a user with the given email and stored password hash; returns its id.
    pub async fn seed_user(pool: &SqlitePool, email: &str, password_hash: &str) -> i64 {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password, created_at, updated_at)
             VALUES ('Admin', 'User', ?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }
}
