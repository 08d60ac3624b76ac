use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// A tracked film as stored in the collection and returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub watched: bool,
    pub watchlist: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload. Every field is optional on the wire so a missing
/// required field becomes a validation error instead of a body rejection.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewFilm {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub watched: Option<bool>,
    pub watchlist: Option<bool>,
}

/// Partial update payload. Absent or `null` fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilmPatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub watched: Option<bool>,
    pub watchlist: Option<bool>,
}

/// Body of a successful delete.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub message: String,
    pub deleted_record: Film,
}

impl NewFilm {
    /// Checks the required fields and builds the film to persist.
    pub fn into_film(self, id: Uuid, created_at: DateTime<Utc>) -> Result<Film, StoreError> {
        match (self.title, self.genre, self.year) {
            (Some(title), Some(genre), Some(year))
                if !title.is_empty() && !genre.is_empty() && year != 0 =>
            {
                Ok(Film {
                    id,
                    title,
                    genre,
                    year,
                    watched: self.watched.unwrap_or(false),
                    watchlist: self.watchlist.unwrap_or(false),
                    created_at,
                })
            }
            _ => Err(StoreError::Validation(
                "title, genre and year are required".to_string(),
            )),
        }
    }
}

impl FilmPatch {
    /// Merges the supplied fields into `film`. Required text fields may be
    /// replaced but never cleared; on error `film` is left untouched.
    pub fn apply(self, film: &mut Film) -> Result<(), StoreError> {
        if self.title.as_deref() == Some("") {
            return Err(StoreError::Validation("title cannot be empty".to_string()));
        }
        if self.genre.as_deref() == Some("") {
            return Err(StoreError::Validation("genre cannot be empty".to_string()));
        }
        if let Some(title) = self.title {
            film.title = title;
        }
        if let Some(genre) = self.genre {
            film.genre = genre;
        }
        if let Some(year) = self.year {
            film.year = year;
        }
        if let Some(watched) = self.watched {
            film.watched = watched;
        }
        if let Some(watchlist) = self.watchlist {
            film.watchlist = watchlist;
        }
        Ok(())
    }
}
