use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::auth::REALM;
use crate::view::{TrackNewPage, not_found_page};

/// Failures a handler turns into a response.
///
/// None of these carry internal paths or parse errors to the client.
#[derive(Debug)]
pub enum AppError {
    /// Unknown track, rejected name, missing file or unreadable metadata.
    NotFound,
    /// Missing or wrong admin credentials.
    Unauthorized,
    /// A create-track submission that could not be accepted.
    BadSubmission(String),
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(not_found_page())).into_response(),
            AppError::Unauthorized => {
                let challenge = format!("Basic realm=\"{REALM}\"");
                let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized\n").into_response();
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    res.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                res
            }
            AppError::BadSubmission(msg) => {
                let page = TrackNewPage {
                    is_admin: true,
                    message: Some(&msg),
                };
                (StatusCode::BAD_REQUEST, Html(page.render())).into_response()
            }
            AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error\n").into_response()
            }
        }
    }
}
