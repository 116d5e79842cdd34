//! The mint endpoint.
//!
//! POST /mint — creates a new identifier under an authority and shoulder.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::api::auth::Credential;
use crate::api::error::ApiError;
use crate::engine::{MintError, MintRequest};
use crate::state::AppState;

/// Request to mint a new ARK.
#[derive(Debug, Deserialize)]
pub struct MintArkRequest {
    /// Authority number to mint under.
    pub naan: i64,

    /// Shoulder string; must start with a forward slash.
    pub shoulder: String,

    /// Target URL to bind; empty reserves the identifier without binding.
    #[serde(default)]
    pub url: Option<String>,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Option<String>,

    /// Free-form commitment statement.
    #[serde(default)]
    pub commitment: Option<String>,
}

/// Response carrying the minted identifier in its written form.
#[derive(Debug, Serialize)]
pub struct MintArkResponse {
    pub ark: String,
}

/// Mint a new ARK.
///
/// POST /mint
pub async fn mint_ark(
    State(state): State<AppState>,
    credential: Credential,
    Json(req): Json<MintArkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = credential.request_id.clone();

    if !req.shoulder.starts_with('/') {
        return Err(ApiError::bad_request(
            "invalid_shoulder",
            "Shoulders must start with a forward slash",
        )
        .with_request_id(request_id));
    }

    let authorized_naan = state
        .registry()
        .naan_for_key(credential.key)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to look up access key");
            ApiError::internal("internal_error", "Failed to validate access key")
                .with_request_id(request_id.clone())
        })?;

    // Unknown and inactive keys are indistinguishable from a mismatched
    // authority: all are a 403, and nothing is created.
    if authorized_naan != Some(req.naan) {
        return Err(ApiError::forbidden(
            "forbidden",
            "Access key is not bound to the requested NAAN",
        )
        .with_request_id(request_id));
    }

    let minted = state
        .minter()
        .mint(MintRequest {
            naan: req.naan,
            shoulder: req.shoulder,
            url: req.url.unwrap_or_default(),
            metadata: req.metadata.unwrap_or_default(),
            commitment: req.commitment.unwrap_or_default(),
        })
        .await
        .map_err(|e| match e {
            MintError::Exhausted { collisions } => ApiError::internal(
                "mint_exhausted",
                format!("Gave up creating ark after {collisions} collision(s)"),
            )
            .with_request_id(request_id.clone()),
            MintError::Storage(e) => {
                tracing::error!(error = %e, request_id = %request_id, "Mint failed on storage error");
                ApiError::internal("internal_error", "Failed to mint ARK")
                    .with_request_id(request_id.clone())
            }
        })?;

    Ok(Json(MintArkResponse {
        ark: format!("ark:/{}", minted.record.ark),
    }))
}
