use serde::{Deserialize, Serialize};

/// Payload of the `loginToken` JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // user ID
    pub fullname: String, // display name, copied onto owned toys
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
    pub iss: String,      // issuer
    pub aud: String,      // audience
}
