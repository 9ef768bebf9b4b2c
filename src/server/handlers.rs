use std::path::PathBuf;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error, info};

use super::access::{Access, Admin};
use super::error::AppError;
use super::form::read_submission;
use super::AppState;
use crate::library::{StoreError, Track, is_allowed_name};
use crate::view::{HomePage, TrackNewPage, TrackPage, path_segment};

pub async fn home(State(state): State<AppState>, access: Access) -> Html<String> {
    let tracks = state.catalog.snapshot();
    Html(
        HomePage {
            tracks: &tracks,
            is_admin: access.is_admin,
        }
        .render(),
    )
}

pub async fn track(
    State(state): State<AppState>,
    access: Access,
    name: Result<Path<String>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let name = allowed_name(name)?;
    let store = state.store.clone();

    let track = tokio::task::spawn_blocking(move || store.load_one(&name))
        .await
        .map_err(|e| {
            error!(error = %e, "track lookup task failed");
            AppError::Internal
        })?
        .map_err(not_found)?;

    Ok(Html(
        TrackPage {
            track: &track,
            is_admin: access.is_admin,
        }
        .render(),
    ))
}

pub async fn track_source(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
    req: Request,
) -> Result<Response, AppError> {
    let name = allowed_name(name)?;
    let path = state.store.audio_path(&name).map_err(not_found)?;
    serve_file(path, req).await
}

pub async fn track_image(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
    req: Request,
) -> Result<Response, AppError> {
    let name = allowed_name(name)?;
    let path = state.store.cover_path(&name).map_err(not_found)?;
    serve_file(path, req).await
}

pub async fn login(_admin: Admin) -> Redirect {
    Redirect::to("/")
}

pub async fn track_new_form(_admin: Admin) -> Html<String> {
    Html(
        TrackNewPage {
            is_admin: true,
            message: None,
        }
        .render(),
    )
}

/// Create a track from the submitted form and publish it to the catalog.
///
/// The admin check runs before the body is read.
pub async fn track_new_submit(
    _admin: Admin,
    State(state): State<AppState>,
    req: Request,
) -> Result<Redirect, AppError> {
    let new = read_submission(req, &state).await.map_err(|e| {
        debug!(error = %e, "create-track submission rejected");
        AppError::BadSubmission(e.to_string())
    })?;

    let store = state.store.clone();
    let track = new.track.clone();
    let written = tokio::task::spawn_blocking(move || {
        if new.media.is_empty() {
            store.create(&new.track)
        } else {
            store.create_with_media(&new.track, &new.media)
        }
    })
    .await
    .map_err(|e| {
        error!(error = %e, "create-track task failed");
        AppError::Internal
    })?;

    written.map_err(|e| match e {
        StoreError::InvalidName(_) => AppError::BadSubmission(e.to_string()),
        e => {
            error!(track = %track.title, error = %e, "failed to write track");
            AppError::Internal
        }
    })?;

    info!(track = %track.title, "track created");
    let location = format!("/track/{}", path_segment(&track.title));
    publish(&state, track);

    Ok(Redirect::to(&location))
}

/// Router fallback for every unmatched path.
pub async fn fallback() -> AppError {
    AppError::NotFound
}

fn publish(state: &AppState, track: Track) {
    state.catalog.publish(track);
    debug!(tracks = state.catalog.len(), "catalog updated");
}

/// Unwrap a `{name}` segment, turning a bad encoding or a disallowed name
/// into the plain not-found response.
fn allowed_name(name: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    match name {
        Ok(Path(name)) if is_allowed_name(&name) => Ok(name),
        Ok(Path(name)) => {
            debug!(name = %name, "rejected track name");
            Err(AppError::NotFound)
        }
        Err(e) => {
            debug!(error = %e, "unreadable track name");
            Err(AppError::NotFound)
        }
    }
}

fn not_found(e: StoreError) -> AppError {
    debug!(error = %e, "track lookup failed");
    AppError::NotFound
}

/// Stream a file through the static-file responder, mapping its 404 onto
/// the generic not-found page.
async fn serve_file(path: PathBuf, req: Request) -> Result<Response, AppError> {
    let res = match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res,
        Err(never) => match never {},
    };

    if res.status() == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound);
    }
    Ok(res.into_response())
}
