use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub fullname: String,
    pub username: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            fullname: u.fullname,
            username: u.username,
            is_admin: u.is_admin,
        }
    }
}
