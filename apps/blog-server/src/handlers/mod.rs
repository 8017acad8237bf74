//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profiles;
mod views;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, http::header, web};
use blog_core::PageRequest;
use serde::Deserialize;
use uuid::Uuid;

/// `?page=N` on every listing; missing means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        self.page.map(PageRequest::new).unwrap_or_default()
    }
}

/// 303 to the detail view of a post the caller may not change.
pub(crate) fn redirect_to_post(post_id: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/api/posts/{post_id}")))
        .finish()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::get().to(auth::login_prompt))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::create))
                    .route("/{post_id}", web::get().to(posts::detail))
                    .route("/{post_id}", web::put().to(posts::update))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/comments", web::post().to(comments::create))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            .route("/category/{slug}", web::get().to(categories::posts))
            .route("/profile", web::put().to(profiles::update))
            .route("/profile/{username}", web::get().to(profiles::posts)),
    );
}
