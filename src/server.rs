//! HTTP routing.
//!
//! Routes map onto [`TrackStore`] and [`Catalog`] operations. Every request is
//! handled on its own: credentials are re-checked each time through the
//! `Access` and `Admin` extractors, and nothing is remembered between
//! requests.
//!
//! | Path | Description |
//! |------|-------------|
//! | `/` | Home page listing the catalog |
//! | `/track/{name}` | Track detail page |
//! | `/tracksource/{name}` | The track's `audio/track.mp3` |
//! | `/trackimage/{name}` | The track's `image/cover.png` |
//! | `/tracknew` | Admin-only create-track form and submission |
//! | `/login` | Basic-Auth challenge, redirects home once accepted |
//! | `/main.css`, `/img/icon.png` | Static assets from the pages directory |
//!
//! Anything else, and every rejected track name, gets the generic 404 page.

mod access;
mod error;
mod form;
mod handlers;

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::auth::AdminCredentials;
use crate::library::{Catalog, TrackStore};

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: TrackStore,
    pub catalog: Catalog,
    pub admin: AdminCredentials,
    /// Directory holding `main.css` and `img/icon.png`.
    pub pages_dir: PathBuf,
    /// Body limit for create-track submissions.
    pub max_upload_bytes: usize,
}

/// Build the router with every route wired to `state`.
pub fn router(state: AppState) -> Router {
    let css = ServeFile::new(state.pages_dir.join("main.css"));
    let icon = ServeFile::new(state.pages_dir.join("img").join("icon.png"));
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::home))
        .route("/track/{name}", get(handlers::track))
        .route("/tracksource/{name}", get(handlers::track_source))
        .route("/trackimage/{name}", get(handlers::track_image))
        .route(
            "/tracknew",
            get(handlers::track_new_form)
                .post(handlers::track_new_submit)
                .layer(upload_limit),
        )
        .route("/login", get(handlers::login).post(handlers::login))
        .route_service("/main.css", css)
        .route_service("/img/icon.png", icon)
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
