use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{jwt::JwtKeys, repo_types::MiniUser, services::validate_token};

pub const LOGIN_COOKIE: &str = "loginToken";

/// Caller identified by a valid `loginToken` cookie.
///
/// Handlers that answer 401 with their own message take `Option<LoggedInUser>`.
pub struct LoggedInUser(pub MiniUser);

#[async_trait]
impl<S> FromRequestParts<S> for LoggedInUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(LOGIN_COOKIE).map(|c| c.value());

        match validate_token(&keys, token) {
            Some(user) => Ok(LoggedInUser(user)),
            None => {
                if token.is_some() {
                    warn!("invalid or expired login token");
                }
                Err((StatusCode::UNAUTHORIZED, "Not logged in".to_string()))
            }
        }
    }
}
