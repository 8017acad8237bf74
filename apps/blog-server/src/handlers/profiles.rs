//! Profile pages and self-service profile edits.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::domain::ProfileChanges;
use blog_shared::dto::{ProfilePostsResponse, UpdateProfileRequest};

use super::{PageQuery, views};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=N
pub async fn posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = identity.actor();
    let (page, user) = state
        .queries
        .list_by_profile(&path, viewer.as_ref(), Utc::now(), query.request())
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePostsResponse {
        profile: views::profile(user),
        posts: views::posts(page),
    }))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = ProfileChanges {
        username: req.username,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let user = state.profiles.update(&identity.actor(), changes).await?;
    Ok(HttpResponse::Ok().json(views::account(user)))
}
