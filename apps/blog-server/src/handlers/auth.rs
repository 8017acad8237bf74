//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::ports::{PasswordService, TokenService};
use blog_shared::dto::{AuthResponse, LoginPromptResponse, LoginRequest, RegisterUserRequest};
use serde::Deserialize;

use super::views;
use crate::middleware::auth::{Identity, LOGIN_PATH};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(
    token_service: &dyn TokenService,
    user_id: Uuid,
    username: &str,
) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(user_id, username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .profiles
        .register(req.username, req.email, password_hash)
        .await?;

    let response = issue_token(token_service.get_ref().as_ref(), user.id, &user.username)?;
    Ok(HttpResponse::Created().json(response))
}

#[derive(Debug, Deserialize)]
pub struct LoginPromptQuery {
    pub next: Option<String>,
}

/// GET /api/auth/login?next=<path>
///
/// Target of the redirect sent to anonymous callers of protected routes.
pub async fn login_prompt(query: web::Query<LoginPromptQuery>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPromptResponse {
        login_url: LOGIN_PATH.to_string(),
        next: query.into_inner().next,
    })
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown usernames and wrong passwords look the same to the caller
    let user = match state.profiles.find(&req.username).await {
        Ok(user) => user,
        Err(DomainError::NotFound { .. }) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::warn!(username = %req.username, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    let response = issue_token(token_service.get_ref().as_ref(), user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.profiles.get(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::account(user)))
}
