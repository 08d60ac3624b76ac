//! Client-side cache of the film list kept in step with the service.
//!
//! # Design
//! `ViewSynchronizer` owns everything a view needs: the cached list, the
//! active filter and search query, the staged creation form, and a status.
//! Independent instances share nothing.
//!
//! Mutations never write speculative state. Each one stages its payload,
//! waits for the service, and only then touches the cache with what the
//! service returned. A failed request leaves the cache exactly as it was.
//! `refresh` is the only operation that replaces the cache wholesale.

use chrono::{Datelike, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::FilmClient;
use crate::error::{ApiError, SyncError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Film, FilmPatch, NewFilm};
use crate::view::{derive_view, FilterCounts, FilterMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// No refresh has succeeded yet.
    Loading,
    Ready,
    /// The last refresh failed; the cache still holds the previous list.
    Error(String),
}

/// Fields staged for the next `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingForm {
    pub title: String,
    pub genre: String,
    pub year: Option<i32>,
    pub watched: bool,
    pub watchlist: bool,
}

impl Default for PendingForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: String::new(),
            year: Some(Utc::now().year()),
            watched: false,
            watchlist: false,
        }
    }
}

impl PendingForm {
    /// Title, genre and a non-zero year are all required.
    pub fn to_new_film(&self) -> Result<NewFilm, SyncError> {
        match self.year {
            Some(year) if year != 0 && !self.title.is_empty() && !self.genre.is_empty() => {
                Ok(NewFilm {
                    title: self.title.clone(),
                    genre: self.genre.clone(),
                    year,
                    watched: self.watched,
                    watchlist: self.watchlist,
                })
            }
            _ => Err(SyncError::Rejected(
                "title, genre and year are all required".to_string(),
            )),
        }
    }
}

/// Caller's answer to "delete this film?", obtained before calling `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Film),
    Declined,
}

pub struct ViewSynchronizer<T> {
    client: FilmClient,
    transport: T,
    records: Vec<Film>,
    filter: FilterMode,
    search: String,
    pending: PendingForm,
    status: ViewStatus,
}

impl<T: Transport> ViewSynchronizer<T> {
    pub fn new(client: FilmClient, transport: T) -> Self {
        Self {
            client,
            transport,
            records: Vec::new(),
            filter: FilterMode::All,
            search: String::new(),
            pending: PendingForm::default(),
            status: ViewStatus::Loading,
        }
    }

    /// Replaces the cache with the service's current list.
    pub fn refresh(&mut self) -> Result<&[Film], SyncError> {
        let request = self.client.build_list_films();
        match self.send(request, FilmClient::parse_list_films) {
            Ok(films) => {
                debug!(count = films.len(), "film list refreshed");
                self.records = films;
                self.status = ViewStatus::Ready;
                Ok(&self.records)
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping cached list");
                self.status = ViewStatus::Error(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Submits the pending form. On success the created film is placed first
    /// and the form is reset; otherwise neither the cache nor the form change.
    pub fn create(&mut self) -> Result<&Film, SyncError> {
        let input = self.pending.to_new_film()?;
        let request = self.client.build_create_film(&input)?;
        let film = self.send(request, FilmClient::parse_create_film)?;
        debug!(id = %film.id, title = %film.title, "film created");
        self.records.insert(0, film);
        self.pending = PendingForm::default();
        Ok(&self.records[0])
    }

    /// Lays `patch` over the cached film, sends the full merged field set, and
    /// stores whatever the service returns in place of the cached entry.
    pub fn update(&mut self, id: Uuid, patch: FilmPatch) -> Result<&Film, SyncError> {
        let index = self.position(id)?;
        let merged = patch.merged_over(&self.records[index]);
        let request = self.client.build_update_film(id, &merged)?;
        let film = self.send(request, FilmClient::parse_update_film)?;
        debug!(%id, "film updated");
        self.records[index] = film;
        Ok(&self.records[index])
    }

    pub fn toggle_watched(&mut self, id: Uuid) -> Result<&Film, SyncError> {
        let watched = self.cached(id)?.watched;
        self.update(
            id,
            FilmPatch {
                watched: Some(!watched),
                ..Default::default()
            },
        )
    }

    pub fn toggle_watchlist(&mut self, id: Uuid) -> Result<&Film, SyncError> {
        let watchlist = self.cached(id)?.watchlist;
        self.update(
            id,
            FilmPatch {
                watchlist: Some(!watchlist),
                ..Default::default()
            },
        )
    }

    /// Deletes `id` when `confirmation` allows it. A declined delete makes
    /// no request.
    pub fn delete(&mut self, id: Uuid, confirmation: Confirmation) -> Result<DeleteOutcome, SyncError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Declined);
        }
        let request = self.client.build_delete_film(id);
        let deleted = self.send(request, FilmClient::parse_delete_film)?;
        self.records.retain(|film| film.id != id);
        debug!(%id, "film deleted");
        Ok(DeleteOutcome::Deleted(deleted.deleted_record))
    }

    pub fn view(&self) -> Vec<&Film> {
        derive_view(&self.records, self.filter, &self.search)
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts::tally(&self.records)
    }

    pub fn records(&self) -> &[Film] {
        &self.records
    }

    pub fn record(&self, id: Uuid) -> Option<&Film> {
        self.records.iter().find(|film| film.id == id)
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn pending(&self) -> &PendingForm {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingForm {
        &mut self.pending
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send<R>(
        &mut self,
        request: HttpRequest,
        parse: impl FnOnce(&FilmClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let response = self.transport.execute(request)?;
        parse(&self.client, response)
    }

    fn position(&self, id: Uuid) -> Result<usize, SyncError> {
        self.records
            .iter()
            .position(|film| film.id == id)
            .ok_or(SyncError::UnknownRecord(id))
    }

    fn cached(&self, id: Uuid) -> Result<&Film, SyncError> {
        self.record(id).ok_or(SyncError::UnknownRecord(id))
    }
}
