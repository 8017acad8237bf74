//! Authentication extractors.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, http::StatusCode,
    http::header, web,
};
use std::fmt;
use std::future::{Ready, ready};
use std::sync::Arc;

use blog_core::domain::Actor;
use blog_core::ports::{AuthError, TokenClaims, TokenService};
use blog_shared::ErrorResponse;

/// Where unauthenticated requests to protected routes are sent.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.username.clone())
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for authentication failures.
///
/// A request without credentials is redirected to the login flow with the
/// original path in `next`; bad credentials get a 401.
#[derive(Debug)]
pub struct AuthenticationError {
    pub error: AuthError,
    pub next: String,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.error {
            AuthError::MissingAuth => StatusCode::SEE_OTHER,
            AuthError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.error {
            AuthError::MissingAuth => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, login_location(&self.next)))
                    .finish();
            }
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::InvalidCredentials => ErrorResponse::unauthorized(),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Login URL that returns the caller to `next` afterwards.
pub fn login_location(next: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(token_service) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    token_service.validate_token(token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|error| AuthenticationError {
            error,
            next: req.path().to_string(),
        }))
    }
}

/// Optional identity extractor - anonymous when no valid token is present.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(Identity::actor)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_location_encodes_next() {
        assert_eq!(
            login_location("/api/posts/1/comments"),
            "/api/auth/login?next=%2Fapi%2Fposts%2F1%2Fcomments"
        );
        assert_eq!(
            login_location("/api/posts?x=1&y=2"),
            "/api/auth/login?next=%2Fapi%2Fposts%3Fx%3D1%26y%3D2"
        );
    }
}
