use thiserror::Error;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, PublicUser, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::MiniUser,
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("username already taken")]
    UsernameTaken,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub async fn get_by_id(users: &UserStore, id: &str) -> Result<PublicUser, UserError> {
    users
        .find_by_id(id)
        .await
        .map(PublicUser::from)
        .ok_or(UserError::NotFound)
}

/// Usernames are matched trimmed, the way `signup` stores them.
pub async fn check_login(users: &UserStore, creds: &LoginRequest) -> Result<PublicUser, UserError> {
    let username = creds.username.trim();
    let Some(user) = users.find_by_username(username).await else {
        warn!(%username, "login unknown username");
        return Err(UserError::InvalidCredentials);
    };
    if !verify_password(&creds.password, &user.password)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(UserError::InvalidCredentials);
    }
    Ok(user.into())
}

pub async fn signup(users: &UserStore, req: &SignupRequest) -> Result<PublicUser, UserError> {
    let fullname = req.fullname.trim();
    let username = req.username.trim();
    if fullname.is_empty() {
        return Err(UserError::MissingField("fullname"));
    }
    if username.is_empty() {
        return Err(UserError::MissingField("username"));
    }
    if req.password.is_empty() {
        return Err(UserError::MissingField("password"));
    }

    let hash = hash_password(&req.password)?;
    let user = users.create(fullname, username, &hash).await?;
    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok(user.into())
}

pub fn get_login_token(keys: &JwtKeys, user: &PublicUser) -> anyhow::Result<String> {
    keys.sign(&MiniUser {
        id: user.id.clone(),
        fullname: user.fullname.clone(),
    })
}

/// `None` for a missing, malformed or expired token.
pub fn validate_token(keys: &JwtKeys, token: Option<&str>) -> Option<MiniUser> {
    let claims = keys.verify(token?).ok()?;
    Some(MiniUser {
        id: claims.sub,
        fullname: claims.fullname,
    })
}
