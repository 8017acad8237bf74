//! Category listing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_shared::dto::CategoryPostsResponse;

use super::{PageQuery, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/category/{slug}?page=N
///
/// Unknown and unpublished categories are both a 404.
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (page, category) = state
        .queries
        .list_by_category(&path, Utc::now(), query.request())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: views::category(category),
        posts: views::posts(page),
    }))
}
