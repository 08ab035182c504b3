use serde::{Deserialize, Serialize};

/// User record as stored in the users file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub username: String,
    pub password: String, // argon2 PHC string, never sent to clients
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Identity carried by the login token and copied onto toys as their owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MiniUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
}
