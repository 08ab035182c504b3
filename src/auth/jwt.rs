use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::{claims::Claims, repo_types::MiniUser};
use crate::{config::JwtConfig, state::AppState};

/// Signing and verification keys for login tokens.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
        }
    }

    pub fn sign(&self, user: &MiniUser) -> anyhow::Result<String> {
        self.sign_with_ttl(user, TimeDuration::seconds(self.ttl.as_secs() as i64))
    }

    /// A negative `ttl` yields a token that is already expired.
    pub(crate) fn sign_with_ttl(&self, user: &MiniUser, ttl: TimeDuration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + ttl;
        let claims = Claims {
            sub: user.id.clone(),
            fullname: user.fullname.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "login token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "login token verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    fn puki() -> MiniUser {
        MiniUser {
            id: "u101".into(),
            fullname: "Puki Ja".into(),
        }
    }

    #[test]
    fn sign_and_verify_login_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.sign(&puki()).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "u101");
        assert_eq!(claims.fullname, "Puki Ja");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.sign(&puki()).expect("sign");
        assert!(bad_keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_secret_and_garbage() {
        let keys = make_keys("one", "iss", "aud");
        let other = make_keys("two", "iss", "aud");
        let token = other.sign(&puki()).expect("sign");
        assert!(keys.verify(&token).is_err());
        assert!(keys.verify("not.a.token").is_err());
    }

    #[test]
    fn verify_rejects_token_past_leeway() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let stale = keys
            .sign_with_ttl(&puki(), TimeDuration::minutes(-5))
            .expect("sign");
        assert!(keys.verify(&stale).is_err());

        let fresh = keys
            .sign_with_ttl(&puki(), TimeDuration::minutes(5))
            .expect("sign");
        assert!(keys.verify(&fresh).is_ok());
    }
}
