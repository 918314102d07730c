/// Upload endpoints
///
/// The API never proxies file bytes. Clients ask for a presigned URL, PUT
/// the file straight to object storage, then reference the public URL (for
/// profile images, via `PATCH /api/users/...`).
///
/// # Endpoints
///
/// - `POST /api/uploads/presign` (authenticated)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::storage::{generate_object_key, presign::presign_put};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Presigned URLs expire after 15 minutes
const UPLOAD_URL_TTL_SECS: u64 = 900;

/// Presign request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,
}

/// Presign response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    /// Presigned PUT URL, valid for 15 minutes
    pub upload_url: String,

    /// Public URL of the object once uploaded
    pub public_url: String,

    /// Object key
    pub key: String,
}

/// Issue a presigned upload URL
pub async fn presign_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PresignRequest>,
) -> ApiResult<Json<PresignResponse>> {
    req.validate()?;

    let key = generate_object_key("profile", &user.id.to_string(), &req.file_name);
    let upload_url = presign_put(&state.config.s3, &key, UPLOAD_URL_TTL_SECS, Utc::now());
    let public_url = state.config.s3.public_url(&key);

    Ok(Json(PresignResponse {
        upload_url,
        public_url,
        key,
    }))
}
