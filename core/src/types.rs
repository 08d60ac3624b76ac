//! Film DTOs as seen by the client.
//!
//! Defined independently of the server crate; the integration tests catch
//! schema drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub watchlist: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a film.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFilm {
    pub title: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub watchlist: bool,
}

/// Field set for an update. Omitted fields are not serialized, so the
/// server leaves them unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist: Option<bool>,
}

impl FilmPatch {
    /// `film` with this patch laid over it, as a complete field set.
    pub fn merged_over(&self, film: &Film) -> FilmPatch {
        FilmPatch {
            title: Some(self.title.clone().unwrap_or_else(|| film.title.clone())),
            genre: Some(self.genre.clone().unwrap_or_else(|| film.genre.clone())),
            year: Some(self.year.unwrap_or(film.year)),
            watched: Some(self.watched.unwrap_or(film.watched)),
            watchlist: Some(self.watchlist.unwrap_or(film.watchlist)),
        }
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFilm {
    pub message: String,
    pub deleted_record: Film,
}

/// Error body returned by the service on any failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
