//! The update endpoint.
//!
//! PUT /update — overwrites the mutable fields of a minted identifier.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::api::auth::Credential;
use crate::api::error::ApiError;
use crate::engine::UpdateError;
use crate::registry::ArkMutation;
use crate::state::AppState;

/// Request to update an existing ARK.
///
/// Omitted optional fields overwrite with empty strings rather than being
/// preserved; an update always sets all three mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateArkRequest {
    /// The identifier to update, in any accepted written form.
    pub ark: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub metadata: Option<String>,

    #[serde(default)]
    pub commitment: Option<String>,
}

/// Update an existing ARK.
///
/// PUT /update
pub async fn update_ark(
    State(state): State<AppState>,
    credential: Credential,
    Json(req): Json<UpdateArkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = credential.request_id.clone();

    let authorized_naan = state
        .registry()
        .naan_for_key(credential.key)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to look up access key");
            ApiError::internal("internal_error", "Failed to validate access key")
                .with_request_id(request_id.clone())
        })?;

    let Some(authorized_naan) = authorized_naan else {
        return Err(
            ApiError::forbidden("forbidden", "Access key is not recognized")
                .with_request_id(request_id),
        );
    };

    let changes = ArkMutation {
        url: req.url.unwrap_or_default(),
        metadata: req.metadata.unwrap_or_default(),
        commitment: req.commitment.unwrap_or_default(),
    };

    state
        .updater()
        .update(&req.ark, changes, authorized_naan)
        .await
        .map_err(|e| match e {
            UpdateError::Malformed(e) => {
                ApiError::bad_request("invalid_ark", format!("Invalid ARK: {e}"))
                    .with_request_id(request_id.clone())
            }
            UpdateError::Forbidden => ApiError::forbidden(
                "forbidden",
                "Access key is not bound to the identifier's NAAN",
            )
            .with_request_id(request_id.clone()),
            UpdateError::NotFound => {
                ApiError::not_found("ark_not_found", format!("No record for {}", req.ark))
                    .with_request_id(request_id.clone())
            }
            UpdateError::Storage(e) => {
                tracing::error!(error = %e, request_id = %request_id, "Update failed on storage error");
                ApiError::internal("internal_error", "Failed to update ARK")
                    .with_request_id(request_id.clone())
            }
        })?;

    Ok(StatusCode::OK)
}
