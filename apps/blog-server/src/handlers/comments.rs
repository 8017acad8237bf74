//! Comment handlers. Every route names the post the comment belongs to.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::{CommentDetails, CommentDraft};
use blog_core::services::Outcome;
use blog_shared::dto::CommentRequest;

use super::{redirect_to_post, views};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn draft(req: CommentRequest) -> CommentDraft {
    CommentDraft { text: req.text }
}

/// POST /api/posts/{post_id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let comment = state
        .comments
        .create(&actor, path.into_inner(), draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(views::comment(CommentDetails {
        comment,
        author: actor.into(),
    })))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let actor = identity.actor();
    let (post_id, comment_id) = path.into_inner();

    match state
        .comments
        .update(&actor, post_id, comment_id, draft(body.into_inner()))
        .await?
    {
        Outcome::Applied(comment) => Ok(HttpResponse::Ok().json(views::comment(CommentDetails {
            comment,
            author: actor.into(),
        }))),
        Outcome::RedirectToPost(id) => Ok(redirect_to_post(id)),
    }
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    match state
        .comments
        .delete(&identity.actor(), post_id, comment_id)
        .await?
    {
        Outcome::Applied(()) => Ok(HttpResponse::NoContent().finish()),
        Outcome::RedirectToPost(id) => Ok(redirect_to_post(id)),
    }
}
