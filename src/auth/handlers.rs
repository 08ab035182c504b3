use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        extractors::LOGIN_COOKIE,
        jwt::JwtKeys,
        services::{self, UserError},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .route("/auth/:userId", get(get_user))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    match services::get_by_id(&state.users, &user_id).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            warn!(error = %e, %user_id, "get_user failed");
            Err((StatusCode::BAD_REQUEST, "Cannot get user".into()))
        }
    }
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<PublicUser>), (StatusCode, String)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "login body rejected");
        (StatusCode::UNAUTHORIZED, "Not you!".to_string())
    })?;
    let user = match services::check_login(&state.users, &payload).await {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, username = %payload.username, "login failed");
            return Err((StatusCode::UNAUTHORIZED, "Not you!".into()));
        }
    };

    let jar = with_login_cookie(&state, jar, &user, "Not you!")?;
    info!(user_id = %user.id, "user logged in");
    Ok((jar, Json(user)))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<PublicUser>), (StatusCode, String)> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "signup body rejected");
        (StatusCode::UNAUTHORIZED, "Nope!".to_string())
    })?;
    let user = match services::signup(&state.users, &payload).await {
        Ok(u) => u,
        Err(UserError::Storage(e)) => {
            error!(error = %e, "signup failed");
            return Err((StatusCode::UNAUTHORIZED, "Nope!".into()));
        }
        Err(e) => {
            warn!(error = %e, username = %payload.username, "signup rejected");
            return Err((StatusCode::UNAUTHORIZED, "Nope!".into()));
        }
    };

    let jar = with_login_cookie(&state, jar, &user, "Nope!")?;
    Ok((jar, Json(user)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, &'static str) {
    (jar.remove(Cookie::build(LOGIN_COOKIE).path("/")), "logged-out!")
}

fn with_login_cookie(
    state: &AppState,
    jar: CookieJar,
    user: &PublicUser,
    failure: &str,
) -> Result<CookieJar, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(state);
    let token = services::get_login_token(&keys, user).map_err(|e| {
        error!(error = %e, user_id = %user.id, "login token sign failed");
        (StatusCode::UNAUTHORIZED, failure.to_string())
    })?;
    let cookie = Cookie::build((LOGIN_COOKIE, token))
        .path("/")
        .same_site(SameSite::Lax);
    Ok(jar.add(cookie))
}
