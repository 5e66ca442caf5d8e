//! Catalog records materialised from the `movies`, `genres` and `users` tables.
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Row, sqlite::SqliteRow};

/// A movie together with the genres attached to it through `movies_genres`.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub release_date: NaiveDate,
    pub runtime: i64,
    pub mpaa_rating: String,
    pub description: String,
    /// Empty when the row has no image.
    pub image: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
    /// Ids of `genres`, same order. Only filled in edit mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres_array: Vec<i64>,
}

// Genres are loaded by a separate query, so rows only carry the movie columns.
impl<'r> FromRow<'r, SqliteRow> for Movie {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Movie {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            release_date: row.try_get("release_date")?,
            runtime: row.try_get("runtime")?,
            mpaa_rating: row.try_get("mpaa_rating")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            genres: Vec::new(),
            genres_array: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Genre {
    pub id: i64,
    pub genre: String,
}

/// A stored account. `password` holds the Argon2 hash and never leaves the process.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_movie() -> Movie {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Movie {
            id: 1,
            title: "Inception".into(),
            release_date: NaiveDate::from_ymd_opt(2010, 7, 16).unwrap(),
            runtime: 148,
            mpaa_rating: "PG-13".into(),
            description: "A thief who steals corporate secrets.".into(),
            image: String::new(),
            created_at: ts,
            updated_at: ts,
            genres: Vec::new(),
            genres_array: Vec::new(),
        }
    }

    #[test]
    fn movie_json_hides_timestamps_and_empty_genre_lists() {
        let json = serde_json::to_value(sample_movie()).unwrap();

        assert_eq!(json["title"], "Inception");
        assert_eq!(json["release_date"], "2010-07-16");
        assert_eq!(json["image"], "");
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
        assert!(json.get("genres").is_none());
        assert!(json.get("genres_array").is_none());
    }

    #[test]
    fn movie_json_includes_genres_when_present() {
        let mut movie = sample_movie();
        movie.genres = vec![Genre {
            id: 1,
            genre: "Sci-Fi".into(),
        }];
        movie.genres_array = vec![1];

        let json = serde_json::to_value(movie).unwrap();
        assert_eq!(json["genres"][0]["genre"], "Sci-Fi");
        assert_eq!(json["genres_array"], serde_json::json!([1]));
    }
}
