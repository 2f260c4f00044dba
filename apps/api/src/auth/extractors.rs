//! Request extractors that authenticate the caller and enforce per-route role
//! allow-lists. Axum runs header extractors before the body extractor, so a
//! rejected caller never has their body parsed.

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// The authenticated caller, taken from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

        let claims = state.tokens.verify(token)?;
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// A named role allow-list.
pub trait RoleSet: Send + Sync + 'static {
    const ALLOWED: &'static [Role];
}

/// HR managers, recruiters and admins.
pub struct HiringTeam;

impl RoleSet for HiringTeam {
    const ALLOWED: &'static [Role] = &[Role::HrManager, Role::Recruiter, Role::Admin];
}

/// HR managers, interviewers and admins.
pub struct InterviewPanel;

impl RoleSet for InterviewPanel {
    const ALLOWED: &'static [Role] = &[Role::HrManager, Role::Interviewer, Role::Admin];
}

/// HR managers and admins.
pub struct HrLeads;

impl RoleSet for HrLeads {
    const ALLOWED: &'static [Role] = &[Role::HrManager, Role::Admin];
}

/// An authenticated caller whose role is in `R::ALLOWED`; otherwise 403.
pub struct Authorized<R: RoleSet> {
    pub user: AuthUser,
    _roles: PhantomData<R>,
}

#[async_trait]
impl<R: RoleSet> FromRequestParts<AppState> for Authorized<R> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !R::ALLOWED.contains(&user.role) {
            return Err(AppError::Forbidden(format!(
                "User role {} is not authorized to access this route",
                user.role
            )));
        }
        Ok(Authorized {
            user,
            _roles: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_sets() {
        assert!(HiringTeam::ALLOWED.contains(&Role::Recruiter));
        assert!(!HiringTeam::ALLOWED.contains(&Role::Interviewer));
        assert!(InterviewPanel::ALLOWED.contains(&Role::Interviewer));
        assert!(!InterviewPanel::ALLOWED.contains(&Role::Recruiter));
        assert!(HrLeads::ALLOWED.contains(&Role::HrManager));
        assert!(HrLeads::ALLOWED.contains(&Role::Admin));
        assert!(!HrLeads::ALLOWED.contains(&Role::Recruiter));
    }
}
