use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::AppState;
use crate::library::{Track, TrackMedia, is_allowed_name};

/// Longest accepted title in bytes. The title becomes a directory name, and
/// common filesystems stop at 255.
pub const MAX_TITLE_LEN: usize = 200;

/// A validated create-track submission.
#[derive(Debug)]
pub struct NewTrack {
    pub track: Track,
    pub media: TrackMedia,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("title may only contain letters, digits, spaces and _ - ( ) ! ? , . &")]
    InvalidTitle,
    #[error("title must be at most {} characters", MAX_TITLE_LEN)]
    TitleTooLong,
    #[error("release date must be a date (YYYY-MM-DD) or Unix seconds")]
    InvalidReleaseDate,
    #[error("could not read the submitted form: {0}")]
    Malformed(String),
}

/// Text fields of a url-encoded submission.
#[derive(Deserialize)]
struct TextFields {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "release-date")]
    release_date: Option<String>,
}

/// Read a create-track submission.
///
/// `multipart/form-data` bodies may carry `audio` and `cover` file parts
/// next to the text fields; anything else is read as a url-encoded form
/// with text fields only.
pub async fn read_submission(req: Request, state: &AppState) -> Result<NewTrack, FormError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| FormError::Malformed(e.body_text()))?;
        read_multipart(multipart).await
    } else {
        let Form(fields) = Form::<TextFields>::from_request(req, state)
            .await
            .map_err(|e| FormError::Malformed(e.body_text()))?;
        Ok(NewTrack {
            track: build_track(fields.title, fields.description, fields.release_date)?,
            media: TrackMedia::default(),
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<NewTrack, FormError> {
    let mut title = None;
    let mut description = None;
    let mut release_date = None;
    let mut media = TrackMedia::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Malformed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(text(field).await?),
            "description" => description = Some(text(field).await?),
            "release-date" => release_date = Some(text(field).await?),
            "audio" => media.audio = non_empty(bytes(field).await?),
            "cover" => media.cover = non_empty(bytes(field).await?),
            _ => {}
        }
    }

    Ok(NewTrack {
        track: build_track(title, description, release_date)?,
        media,
    })
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, FormError> {
    field
        .text()
        .await
        .map_err(|e| FormError::Malformed(e.body_text()))
}

async fn bytes(field: axum::extract::multipart::Field<'_>) -> Result<Bytes, FormError> {
    field
        .bytes()
        .await
        .map_err(|e| FormError::Malformed(e.body_text()))
}

// Browsers send an empty part for a file input left blank.
fn non_empty(bytes: Bytes) -> Option<Vec<u8>> {
    (!bytes.is_empty()).then(|| bytes.to_vec())
}

fn build_track(
    title: Option<String>,
    description: Option<String>,
    release_date: Option<String>,
) -> Result<Track, FormError> {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(FormError::MissingField("title"))?;

    if !is_allowed_name(&title) {
        return Err(FormError::InvalidTitle);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(FormError::TitleTooLong);
    }

    let raw_date = release_date
        .filter(|d| !d.trim().is_empty())
        .ok_or(FormError::MissingField("release-date"))?;
    let release_date = parse_release_date(&raw_date).ok_or(FormError::InvalidReleaseDate)?;

    Ok(Track {
        title,
        description: description.unwrap_or_default(),
        release_date,
    })
}

/// Parse Unix seconds, or a `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_release_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(epoch) = raw.parse::<i64>() {
        return Some(epoch);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
