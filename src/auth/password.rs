//! Password hashing for records in the users file.
//!
//! The `password` field of a stored user holds an argon2 PHC string
//! (`$argon2id$v=19$m=...$<salt>$<hash>`). Salt and cost parameters travel
//! inside it, so a record verifies on its own with no side table.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// PHC string for `plain` under a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// `Ok(false)` for a wrong password. Errors mean the stored value is not a
/// usable PHC string, i.e. the users file was edited by hand.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password is not a PHC string");
        anyhow::anyhow!("parse stored password: {e}")
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}
