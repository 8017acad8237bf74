//! Post handlers: the index listing, detail view and author-only mutations.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::domain::PostDraft;
use blog_core::services::Outcome;
use blog_shared::dto::{PostDetailResponse, PostRequest};

use super::{PageQuery, redirect_to_post, views};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        is_published: req.is_published,
        category_id: req.category_id,
        location_id: req.location_id,
        image: req.image,
    }
}

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.queries.list_index(Utc::now(), query.request()).await?;
    Ok(HttpResponse::Ok().json(views::posts(page)))
}

/// GET /api/posts/{post_id}
///
/// Hidden posts are a 404 for everyone but their author.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let viewer = identity.actor();

    let post = state
        .posts
        .detail(post_id, viewer.as_ref(), Utc::now())
        .await?;
    let comments = state.comments.comments_for(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::post(post),
        comments: comments.into_iter().map(views::comment).collect(),
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let post = state.posts.create(&actor, draft(body.into_inner())).await?;

    let details = state.posts.detail(post.id, Some(&actor), Utc::now()).await?;
    Ok(HttpResponse::Created().json(views::post(details)))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let post_id = path.into_inner();

    match state
        .posts
        .update(&actor, post_id, draft(body.into_inner()))
        .await?
    {
        Outcome::Applied(post) => {
            let details = state.posts.detail(post.id, Some(&actor), Utc::now()).await?;
            Ok(HttpResponse::Ok().json(views::post(details)))
        }
        Outcome::RedirectToPost(id) => Ok(redirect_to_post(id)),
    }
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    match state.posts.delete(&identity.actor(), path.into_inner()).await? {
        Outcome::Applied(()) => Ok(HttpResponse::NoContent().finish()),
        Outcome::RedirectToPost(id) => Ok(redirect_to_post(id)),
    }
}
