/// Authentication middleware
///
/// Runs a small state machine per request:
///
/// - valid access token → resolve the user, proceed
/// - expired (or absent) access token + valid refresh cookie → rotate the
///   pair, proceed, and set fresh cookies on the response; the caller never
///   sees the expiry and never retries
/// - anything else → 401
///
/// A structurally invalid access token fails immediately; the refresh path
/// only recovers from expiry or absence, never from tampering.
///
/// The resolved `AuthUser` is inserted into request extensions for handlers
/// to extract with `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use prepstack_shared::auth::tokens::TokenError;

use crate::{
    app::AppState,
    cookies::{self, ACCESS_COOKIE, REFRESH_COOKIE},
    error::ApiError,
};

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access_token = cookies::extract_cookie(req.headers(), ACCESS_COOKIE)
        .or_else(|| cookies::extract_bearer(req.headers()));

    if let Some(token) = access_token {
        match state.tokens.verify_access(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
                return Ok(next.run(req).await);
            }
            // Expired access falls through to the refresh path
            Err(TokenError::Expired) => {}
            Err(TokenError::Database(err)) => return Err(ApiError::from(err)),
            Err(_) => {
                return Err(ApiError::Unauthorized("Invalid access token".to_string()));
            }
        }
    }

    let refresh_token = cookies::extract_cookie(req.headers(), REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let (user, pair) = state.tokens.rotate(&refresh_token).await.map_err(|err| {
        match err {
            TokenError::Database(err) => ApiError::from(err),
            // Expired, invalid, revoked: all read as "log in again"
            _ => ApiError::Unauthorized("Authentication required".to_string()),
        }
    })?;

    tracing::debug!(user_id = %user.id, "Transparent token refresh");
    req.extensions_mut().insert(user);

    let mut response = next.run(req).await;
    cookies::set_token_cookies(
        response.headers_mut(),
        &pair,
        state.config.jwt.access_ttl_secs,
        state.config.jwt.refresh_ttl_secs,
        state.config.api.production,
    );

    Ok(response)
}
