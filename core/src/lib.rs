//! Client core for the film tracker.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO). On top of that, `ViewSynchronizer`
//! keeps a cached film list consistent with the service and derives the
//! filtered, searched view a front-end renders.
//!
//! # Design
//! - `FilmClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the host supplies a `Transport`.
//! - `view` is pure: filter mode and search query in, borrowed films out.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod sync;
pub mod types;
pub mod view;

pub use client::FilmClient;
pub use error::{ApiError, SyncError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use sync::{Confirmation, DeleteOutcome, PendingForm, ViewStatus, ViewSynchronizer};
pub use types::{DeletedFilm, Film, FilmPatch, NewFilm};
pub use view::{derive_view, FilterCounts, FilterMode};
