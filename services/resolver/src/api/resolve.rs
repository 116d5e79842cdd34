//! The resolve endpoint.
//!
//! GET /{*ark} — resolves an identifier in its written form, e.g.
//! `GET /ark:/99999/t2x4fh2m9pb`. Inflections select an alternate
//! representation: `?info` renders a metadata page, `?json` returns the
//! metadata as a structured payload.

use axum::{
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::engine::{Inflection, Resolution, ResolveError};
use crate::registry::ArkRecord;
use crate::state::AppState;

/// Structured metadata payload for the `json` inflection.
#[derive(Debug, Serialize)]
pub struct ArkInfoResponse {
    pub ark: String,
    pub naan: i64,
    pub shoulder: String,
    pub assigned_name: String,
    pub url: String,
    pub metadata: String,
    pub commitment: String,
}

impl From<ArkRecord> for ArkInfoResponse {
    fn from(record: ArkRecord) -> Self {
        Self {
            ark: record.ark,
            naan: record.naan,
            shoulder: record.shoulder,
            assigned_name: record.assigned_name,
            url: record.url,
            metadata: record.metadata,
            commitment: record.commitment,
        }
    }
}

/// Picks the inflection out of the raw query string.
///
/// Flags are bare query keys (`?info`, `?json`); `json` wins when both are
/// present.
fn inflection_from_query(query: Option<&str>) -> Inflection {
    let Some(query) = query else {
        return Inflection::None;
    };

    let mut inflection = Inflection::None;
    for pair in query.split('&') {
        match pair.split('=').next().unwrap_or_default() {
            "json" => return Inflection::Json,
            "info" => inflection = Inflection::Info,
            _ => {}
        }
    }
    inflection
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Minimal rendered metadata page for the `info` inflection.
fn render_info(record: &ArkRecord) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><title>ark:/{ark}</title></head>\n<body>\n\
         <h1>ark:/{ark}</h1>\n<dl>\n\
         <dt>URL</dt><dd>{url}</dd>\n\
         <dt>Metadata</dt><dd>{metadata}</dd>\n\
         <dt>Commitment</dt><dd>{commitment}</dd>\n\
         </dl>\n</body>\n</html>\n",
        ark = escape_html(&record.ark),
        url = escape_html(&record.url),
        metadata = escape_html(&record.metadata),
        commitment = escape_html(&record.commitment),
    )
}

/// Resolve an ARK.
///
/// GET /{*ark}
pub async fn resolve_ark(
    State(state): State<AppState>,
    Path(ark): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let inflection = inflection_from_query(query.as_deref());

    let resolution = state
        .resolver()
        .resolve(&ark, inflection)
        .await
        .map_err(|e| match e {
            ResolveError::Malformed(e) => {
                ApiError::bad_request("invalid_ark", format!("Invalid ARK: {e}"))
            }
            ResolveError::Storage(e) => {
                tracing::error!(error = %e, ark = %ark, "Resolution failed on storage error");
                ApiError::internal("internal_error", "Failed to resolve ARK")
            }
        })?;

    Ok(match resolution {
        Resolution::Redirect(target) => Redirect::temporary(&target).into_response(),
        Resolution::Metadata(record) => match inflection {
            Inflection::Json => Json(ArkInfoResponse::from(record)).into_response(),
            _ => Html(render_info(&record)).into_response(),
        },
        Resolution::NotFound => ApiError::not_found(
            "ark_not_bound",
            format!("ARK {ark} exists but has no bound URL"),
        )
        .into_response(),
    })
}
