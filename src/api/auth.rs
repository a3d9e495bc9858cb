use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse};
use crate::db::Account;
use crate::state::AppState;

/// Cookie carrying the admin token for browser clients.
pub const ADMIN_TOKEN_COOKIE: &str = "adminToken";

const COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: Account,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Session resolution
// ============================================================================

/// Per-request identity, resolved once before business logic and carried as
/// a request extension. `None` means unauthenticated.
#[derive(Clone)]
pub struct CurrentUser(pub Option<Account>);

/// Resolves the request identity. Runs on every request, protected or not,
/// and never fails the request: any extraction/decode/lookup problem just
/// leaves the identity empty.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match extract_token(request.headers()) {
        Some(token) => state.auth().resolve_token(&token).await,
        None => None,
    };

    if let Some(account) = &identity {
        tracing::debug!(user_id = account.id, "Resolved request identity");
    }

    request.extensions_mut().insert(CurrentUser(identity));
    next.run(request).await
}

/// Gate for the admin surface: anonymous requests stop here with 401.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(|user| user.0.is_some());

    if !authenticated {
        return ApiError::Unauthorized("Not authenticated".to_string()).into_response();
    }

    next.run(request).await
}

/// Token extraction order: the named cookie wins over the Authorization
/// header; whichever is found first is the only one tried.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, ADMIN_TOKEN_COOKIE) {
        return Some(token);
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

fn build_set_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{ADMIN_TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={COOKIE_MAX_AGE_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn build_clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{ADMIN_TOKEN_COOKIE}=; HttpOnly; Path=/; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password; sets the token cookie and also
/// returns the token for header-based clients.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth()
        .login(&payload.username, &payload.password)
        .await?;

    tracing::info!("Login for account: {}", result.account.username);

    let secure = state.config.read().await.server.secure_cookies;
    let cookie = HeaderValue::from_str(&build_set_cookie(&result.token, secure))
        .map_err(|e| ApiError::internal(format!("Failed to build cookie: {e}")))?;

    let mut response = Json(ApiResponse::success(LoginResponse {
        token: result.token,
        account: result.account,
    }))
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// POST /auth/logout
/// Clears the cookie. The token itself stays valid until its embedded
/// expiry; there is no server-side revocation.
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let secure = state.config.read().await.server.secure_cookies;
    let cookie = HeaderValue::from_str(&build_clear_cookie(secure))
        .map_err(|e| ApiError::internal(format!("Failed to build cookie: {e}")))?;

    let mut response = Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// GET /auth/me
/// Current identity, or 401 when anonymous.
pub async fn get_current_user(
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = user
        .0
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(ApiResponse::success(account)))
}

/// PUT /auth/password
/// Change the current account's password after verifying the existing one.
pub async fn change_password(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account = user
        .0
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    state
        .auth()
        .change_password(account.id, &payload.current_password, &payload.new_password)
        .await?;

    tracing::info!("Password changed for account: {}", account.username);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

/// POST /accounts
/// Create another administrator account.
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state
        .auth()
        .create_account(
            &payload.username,
            &payload.password,
            payload.email.as_deref(),
            payload.name.as_deref(),
        )
        .await?;

    tracing::info!("Account created: {}", account.username);

    Ok(Json(ApiResponse::success(account)))
}
