//! Bearer-key extraction for the mint and update endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::api::error::ApiError;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// An access key presented as a bearer token.
///
/// Extraction enforces only the syntactic contract: a header must be
/// present (403 otherwise) and its last whitespace-separated token must be
/// a UUID (400 otherwise). Whether the key is known, active, and bound to
/// the right authority is checked by the handlers against the registry.
#[derive(Debug, Clone)]
pub struct Credential {
    pub key: Uuid,
    pub request_id: String,
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = header_string(&parts.headers, "x-request-id")
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let Some(bearer) = header_string(&parts.headers, AUTHORIZATION_HEADER) else {
            return Err(ApiError::forbidden(
                "missing_credential",
                "Authorization header required",
            )
            .with_request_id(request_id));
        };

        // The key is the last whitespace-separated token, so both
        // "Bearer <key>" and a bare "<key>" are accepted.
        let token = bearer.split_whitespace().last().unwrap_or_default();

        let key = token.parse::<Uuid>().map_err(|_| {
            ApiError::bad_request("invalid_credential", "Access key must be a UUID")
                .with_request_id(request_id.clone())
        })?;

        Ok(Self { key, request_id })
    }
}
