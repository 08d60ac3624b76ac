//! Film persistence behind the [`CollectionStore`] trait.
//!
//! Both implementations share [`Collection`], a plain in-memory document set.
//! `MemoryStore` keeps it behind a lock; `FileStore` additionally writes the
//! whole collection to a JSON document after every mutation.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::StoreError,
    types::{Film, FilmPatch, NewFilm},
};

/// Storage operations the record service depends on.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// All films, newest first.
    async fn list_all(&self) -> Result<Vec<Film>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Film, StoreError>;

    /// Validates required fields, assigns `id` and `createdAt`, persists.
    async fn create(&self, input: NewFilm) -> Result<Film, StoreError>;

    /// Merges `patch` into the stored film and returns the merged result.
    async fn update_by_id(&self, id: Uuid, patch: FilmPatch) -> Result<Film, StoreError>;

    /// Removes the film and returns what was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<Film, StoreError>;
}

#[derive(Clone, Debug)]
struct Entry {
    seq: u64,
    film: Film,
}

/// Unordered set of films keyed by id.
///
/// Every entry carries an insertion sequence number so films created within
/// the same clock tick still list newest first.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    entries: HashMap<Uuid, Entry>,
    next_seq: u64,
}

impl Collection {
    /// Rebuilds a collection from a list in `list()` order (newest first).
    pub fn from_films(films: Vec<Film>) -> Self {
        let mut collection = Self::default();
        for film in films.into_iter().rev() {
            collection.insert(film);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn list(&self) -> Vec<Film> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            b.film
                .created_at
                .cmp(&a.film.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        entries.into_iter().map(|e| e.film.clone()).collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Film> {
        self.entries.get(&id).map(|e| &e.film)
    }

    pub fn insert(&mut self, film: Film) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(film.id, Entry { seq, film });
    }

    pub fn create(&mut self, input: NewFilm) -> Result<Film, StoreError> {
        let film = input.into_film(Uuid::new_v4(), Utc::now())?;
        self.insert(film.clone());
        Ok(film)
    }

    pub fn update(&mut self, id: Uuid, patch: FilmPatch) -> Result<Film, StoreError> {
        let entry = self.entries.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(&mut entry.film)?;
        Ok(entry.film.clone())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Film, StoreError> {
        self.entries
            .remove(&id)
            .map(|e| e.film)
            .ok_or(StoreError::NotFound)
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Film>, StoreError> {
        Ok(self.collection.read().await.list())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Film, StoreError> {
        let collection = self.collection.read().await;
        collection.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: NewFilm) -> Result<Film, StoreError> {
        let film = self.collection.write().await.create(input)?;
        debug!(id = %film.id, title = %film.title, "film created");
        Ok(film)
    }

    async fn update_by_id(&self, id: Uuid, patch: FilmPatch) -> Result<Film, StoreError> {
        self.collection.write().await.update(id, patch)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Film, StoreError> {
        let film = self.collection.write().await.remove(id)?;
        debug!(%id, "film deleted");
        Ok(film)
    }
}

/// Store persisted as a single JSON array on disk.
///
/// Mutations run against a copy of the collection. The copy is written to a
/// temp file and renamed over the document before it replaces the in-memory
/// state, so a failed write leaves both untouched.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collection: Mutex<Collection>,
}

impl FileStore {
    /// Loads the document at `path`; a missing file is an empty collection.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collection = match fs::read(&path).await {
            Ok(bytes) => Collection::from_films(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Collection::default(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), films = collection.len(), "opened film document");
        Ok(Self {
            path,
            collection: Mutex::new(collection),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, collection: &Collection) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&collection.list())?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<R>(
        &self,
        op: impl FnOnce(&mut Collection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut current = self.collection.lock().await;
        let mut next = current.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *current = next;
        Ok(out)
    }
}

#[async_trait]
impl CollectionStore for FileStore {
    async fn list_all(&self) -> Result<Vec<Film>, StoreError> {
        Ok(self.collection.lock().await.list())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Film, StoreError> {
        let collection = self.collection.lock().await;
        collection.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: NewFilm) -> Result<Film, StoreError> {
        let film = self.mutate(|c| c.create(input)).await?;
        debug!(id = %film.id, title = %film.title, "film created");
        Ok(film)
    }

    async fn update_by_id(&self, id: Uuid, patch: FilmPatch) -> Result<Film, StoreError> {
        self.mutate(|c| c.update(id, patch)).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Film, StoreError> {
        let film = self.mutate(|c| c.remove(id)).await?;
        debug!(%id, "film deleted");
        Ok(film)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_film(title: &str, genre: &str, year: i32) -> NewFilm {
        NewFilm {
            title: Some(title.to_string()),
            genre: Some(genre.to_string()),
            year: Some(year),
            ..Default::default()
        }
    }

    #[test]
    fn list_is_newest_first() {
        let mut c = Collection::default();
        let alien = c.create(new_film("Alien", "Horror", 1979)).unwrap();
        let arrival = c.create(new_film("Arrival", "Sci-Fi", 2016)).unwrap();
        let heat = c.create(new_film("Heat", "Crime", 1995)).unwrap();

        let ids: Vec<Uuid> = c.list().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![heat.id, arrival.id, alien.id]);
    }

    #[test]
    fn from_films_preserves_list_order() {
        let mut c = Collection::default();
        c.create(new_film("Alien", "Horror", 1979)).unwrap();
        c.create(new_film("Arrival", "Sci-Fi", 2016)).unwrap();
        let listed = c.list();

        let rebuilt = Collection::from_films(listed.clone());
        assert_eq!(rebuilt.list(), listed);
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let mut c = Collection::default();
        let film = c.create(new_film("Dune", "Sci-Fi", 2021)).unwrap();
        let patch = FilmPatch {
            watchlist: Some(true),
            ..Default::default()
        };
        let updated = c.update(film.id, patch).unwrap();
        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.year, 2021);
        assert!(updated.watchlist);
        assert!(!updated.watched);
        assert_eq!(updated.created_at, film.created_at);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut c = Collection::default();
        assert!(matches!(
            c.update(Uuid::nil(), FilmPatch::default()),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(c.remove(Uuid::nil()), Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn memory_store_delete_returns_removed_film() {
        let store = MemoryStore::new();
        let film = store.create(new_film("Heat", "Crime", 1995)).await.unwrap();
        let deleted = store.delete_by_id(film.id).await.unwrap();
        assert_eq!(deleted, film);
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(matches!(
            store.get_by_id(film.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn memory_store_rejects_invalid_create() {
        let store = MemoryStore::new();
        let err = store.create(NewFilm::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("films.json");

        let store = FileStore::open(&path).await.unwrap();
        let alien = store.create(new_film("Alien", "Horror", 1979)).await.unwrap();
        let arrival = store.create(new_film("Arrival", "Sci-Fi", 2016)).await.unwrap();
        store
            .update_by_id(
                alien.id,
                FilmPatch {
                    watched: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        let films = reopened.list_all().await.unwrap();
        assert_eq!(films.len(), 2);
        assert_eq!(films[0].id, arrival.id);
        assert_eq!(films[1].id, alien.id);
        assert!(films[1].watched);
    }

    #[tokio::test]
    async fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("films.json");
        let store = FileStore::open(&path).await.unwrap();

        // parent directory does not exist, so the write fails
        let err = store.create(new_film("Heat", "Crime", 1995)).await.unwrap_err();
        assert!(matches!(err, StoreError::Failure(_)));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_corrupt_document_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("films.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Failure(_)));
    }
}
