//! HTTP record service for the film tracker.
//!
//! A thin axum router over a [`CollectionStore`]. Handlers hold no state of
//! their own; every request is served independently against the shared store
//! handle.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;
pub mod types;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{AppError, StoreError};
pub use store::{Collection, CollectionStore, FileStore, MemoryStore};
pub use types::{Deleted, Film, FilmPatch, NewFilm};

pub type Db = Arc<dyn CollectionStore>;

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    router(Arc::new(MemoryStore::new()))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/records", get(routes::list_films).post(routes::create_film))
        .route(
            "/records/{id}",
            get(routes::get_film)
                .put(routes::update_film)
                .delete(routes::delete_film),
        )
        .fallback(routes::not_found)
        .with_state(db)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db)).await
}
