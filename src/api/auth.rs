use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::validation::validate_registration;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

/// Login accepts either identifier; both must match when both are sent.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
}

/// Identity attached to the request by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i32,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware. The `Authorization` header carries the raw
/// session token (a `Bearer ` prefix is tolerated and stripped); the token
/// is resolved against the sessions table and the owning user id attached
/// to the request for downstream handlers.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(&headers) else {
        return Err(ApiError::Unauthorized("Missing token".to_string()));
    };

    let session = state
        .store()
        .find_valid_session(&token)
        .await
        .map_err(|e| ApiError::internal(format!("Session lookup failed: {e}")))?;

    let Some(session) = session else {
        return Err(ApiError::Unauthorized("Invalid session".to_string()));
    };

    tracing::Span::current().record("user_id", session.user_id);
    request
        .extensions_mut()
        .insert(CurrentUser {
            id: session.user_id,
        });

    Ok(next.run(request).await)
}

/// Extract the raw session token from the Authorization header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    (!token.is_empty()).then(|| token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
/// Create a new user. Username and email must both be unclaimed.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (username, email, password) = validate_registration(
        payload.username.as_deref(),
        payload.email.as_deref(),
        payload.password.as_deref(),
    )?;

    let exists = state
        .store()
        .user_exists(&username, &email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to check existing users: {e}")))?;

    if exists {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    state
        .store()
        .create_user(&username, &email, &password, &state.config().security)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create user: {e}")))?;

    tracing::info!("Registered user {username}");

    Ok(Json(RegisterResponse { success: true }))
}

/// POST /login
/// Verify credentials and mint a fresh session token. Each successful login
/// creates a new session; concurrent sessions per user are allowed.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.username.is_none() && payload.email.is_none() {
        return Err(ApiError::validation("Please provide username or email"));
    }

    let Some(password) = payload.password.as_deref() else {
        return Err(ApiError::validation("Password is required"));
    };

    let user = state
        .store()
        .verify_login(payload.username.as_deref(), payload.email.as_deref(), password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid Login".to_string()))?;

    let token = state
        .store()
        .create_session(user.id, state.config().security.session_ttl_hours)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(TokenResponse { token }))
}

/// GET /logout
/// Delete the presented session, then send the caller back to the static
/// landing page. A missing or unknown token still redirects.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    if let Some(token) = extract_token(&headers) {
        state
            .store()
            .delete_session(&token)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to delete session: {e}")))?;
    }

    Ok(Redirect::to("/"))
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .store()
        .get_user(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        username: user.username,
        email: user.email,
    }))
}
