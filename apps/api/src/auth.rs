//! Auth guard — bearer-credential verification for every student route.
//!
//! Runs exactly once per request, before any handler logic. A request is
//! either rejected with 401 here or reaches its handler with an `AuthUser`
//! attached to the request extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims carried in the bearer token. The `userId` claim identifies the
/// owner used to scope all store queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: usize,
}

/// The authenticated caller, inserted into request extensions by
/// [`require_auth`] and read by handlers via `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Axum middleware gating the student routes.
///
/// Missing or non-`Bearer` Authorization header → 401 "Not authorized, no token".
/// Decode failure against the configured secret → 401 "Not authorized, token failed".
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = header_value
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    let key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
    let decoded = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
        .map_err(|e| {
            // The raw token is deliberately never logged.
            debug!("token verification failed: {e}");
            AppError::Unauthorized("Not authorized, token failed".to_string())
        })?;

    debug!(user_id = %decoded.claims.user_id, "bearer token verified");
    req.extensions_mut().insert(AuthUser(decoded.claims.user_id));

    Ok(next.run(req).await)
}
