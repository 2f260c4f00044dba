//! Axum route handlers for /api/auth.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{NewUser, ProfileUpdate, Role, User, UserProfile};
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;
use crate::store::DUPLICATE_EMAIL;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPayload {
    pub token: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>), AppError> {
    let email = normalize_email(req.email.as_deref())?;
    let password = req.password.unwrap_or_default();
    validate_password(&password)?;
    let first_name = required_name(req.first_name, "First name")?;
    let last_name = required_name(req.last_name, "Last name")?;
    let role = match req.role.as_deref() {
        Some(raw) => raw.parse::<Role>().map_err(AppError::Validation)?,
        None => Role::default(),
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let user = state
        .users
        .create(NewUser {
            email,
            password_hash: hash_password(&password)?,
            first_name,
            last_name,
            role,
        })
        .await?;
    info!("Registered user {} with role {}", user.id, user.role);

    let token = state.tokens.issue(&user)?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("User registered successfully", auth_payload(&user, token)),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401. There is no lockout.
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, AppError> {
    let email = normalize_email(req.email.as_deref())?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Password is required".to_string()))?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let user = state.users.find_by_email(&email).await?.ok_or_else(invalid)?;
    if !verify_password(&password, &user.password_hash) {
        return Err(invalid());
    }

    let token = state.tokens.issue(&user)?;
    state.users.record_login(user.id, Utc::now()).await?;
    info!("User {} logged in", user.id);

    Ok(ApiResponse::ok("Login successful", auth_payload(&user, token)))
}

/// GET /api/auth/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user = load_user(&state, caller.id).await?;
    Ok(ApiResponse::ok("Profile retrieved", UserProfile::from(&user)))
}

/// PUT /api/auth/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let update = ProfileUpdate {
        first_name: req
            .first_name
            .map(|name| required_name(Some(name), "First name"))
            .transpose()?,
        last_name: req
            .last_name
            .map(|name| required_name(Some(name), "Last name"))
            .transpose()?,
        phone_number: req.phone_number.map(validate_phone).transpose()?,
        department: req.department.map(|d| d.trim().to_string()),
        position: req.position.map(|p| p.trim().to_string()),
    };

    let user = state.users.update_profile(caller.id, update).await?;
    Ok(ApiResponse::ok("Profile updated", UserProfile::from(&user)))
}

/// POST /api/auth/change-password
pub async fn handle_change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let current = req
        .current_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Current password is required".to_string()))?;
    let new_password = req.new_password.unwrap_or_default();
    validate_password(&new_password)?;

    let user = load_user(&state, caller.id).await?;
    if !verify_password(&current, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    state
        .users
        .update_password(user.id, &hash_password(&new_password)?)
        .await?;
    info!("User {} changed password", user.id);

    Ok(ApiResponse::message("Password changed successfully"))
}

/// POST /api/auth/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<TokenPayload>>, AppError> {
    let user = load_user(&state, caller.id).await?;
    let token = state.tokens.issue(&user)?;
    Ok(ApiResponse::ok("Token refreshed", TokenPayload { token }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

fn auth_payload(user: &User, token: String) -> AuthPayload {
    AuthPayload {
        user: UserSummary {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        },
        token,
    }
}

/// Trims and lower-cases an email, rejecting anything that is not shaped like one.
fn normalize_email(raw: Option<&str>) -> Result<String, AppError> {
    let email = raw.unwrap_or_default().trim().to_lowercase();
    let invalid = || AppError::Validation("A valid email is required".to_string());

    if email.is_empty() || email.len() > 255 {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(email)
}

fn required_name(raw: Option<String>, field: &str) -> Result<String, AppError> {
    raw.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn validate_phone(raw: String) -> Result<String, AppError> {
    let phone = raw.trim().to_string();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !allowed || !(7..=15).contains(&digits) {
        return Err(AppError::Validation(
            "Phone number is not valid".to_string(),
        ));
    }
    Ok(phone)
}
