use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use std::convert::Infallible;
use tracing::debug;

use super::AppState;
use super::error::AppError;
use crate::auth::AdminCredentials;

/// Per-request admin capability, derived from the Basic-Auth header.
///
/// Missing or malformed credentials simply yield `is_admin == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub is_admin: bool,
}

impl Access {
    pub fn from_headers(headers: &HeaderMap, admin: &AdminCredentials) -> Self {
        let is_admin = match headers.typed_get::<Authorization<Basic>>() {
            Some(auth) => admin.check_credentials(auth.username(), auth.password(), true),
            None => admin.check_credentials("", "", false),
        };
        Self { is_admin }
    }
}

impl FromRequestParts<AppState> for Access {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.admin))
    }
}

/// Proof that the request carried valid admin credentials.
///
/// Rejects with a 401 Basic challenge otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if Access::from_headers(&parts.headers, &state.admin).is_admin {
            Ok(Admin)
        } else {
            debug!(path = %parts.uri.path(), "admin credentials missing or rejected");
            Err(AppError::Unauthorized)
        }
    }
}
