use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Session token payload. Only the user id is embedded; no other account
/// fields travel in the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

/// Holds JWT signing and verification keys with config data. Built once from
/// the process config at startup; tests construct their own with distinct
/// secrets.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub session_ttl: Duration,
    pub refresh_after: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            session_ttl: Duration::from_secs((cfg.session_ttl_days as u64) * 24 * 60 * 60),
            refresh_after: Duration::from_secs((cfg.refresh_minutes as u64) * 60),
        }
    }

    /// Mint a session token for `user_id`, valid for the full session TTL.
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.session_ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session token signed");
        Ok(token)
    }

    /// Bad signature, wrong issuer/audience and expiry all collapse into one
    /// opaque error; callers must not leak which check failed.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session token verified");
        Ok(data.claims)
    }

    /// Sliding-window refresh: re-sign a valid, unexpired session once it is
    /// older than the refresh cadence. Younger tokens come back as `None`.
    /// An expired or tampered token never refreshes.
    pub fn refresh(&self, token: &str) -> anyhow::Result<Option<String>> {
        let claims = self.verify(token)?;
        let age = OffsetDateTime::now_utc().unix_timestamp() - claims.iat as i64;
        if age < self.refresh_after.as_secs() as i64 {
            return Ok(None);
        }
        Ok(Some(self.sign(claims.sub)?))
    }
}

/// Extracts the authenticated user id from a `Bearer` session token.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::SessionInvalid)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::SessionInvalid)?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(_) => {
                warn!("invalid or expired session token");
                Err(ApiError::SessionInvalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            session_ttl_days: 30,
            refresh_minutes: 5,
        })
    }

    fn encode_raw(keys: &JwtKeys, iat: i64, exp: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: iat as usize,
            exp: exp as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        encode(&Header::default(), &claims, &keys.encoding).expect("encode")
    }

    #[test]
    fn sign_and_verify_session_token() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        // 30-day session
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_wrong_secret_regardless_of_expiry() {
        let signer = make_keys("secret-a");
        let verifier = make_keys("secret-b");
        let token = signer.sign(Uuid::new_v4()).expect("sign");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Expired an hour ago, well past default leeway.
        let token = encode_raw(&keys, now - 7200, now - 3600);
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let keys = make_keys("dev-secret");
        let mut other = make_keys("dev-secret");
        other.issuer = "someone-else".into();
        let token = other.sign(Uuid::new_v4()).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn refresh_leaves_young_token_alone() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        let refreshed = keys.refresh(&token).expect("refresh");
        assert!(refreshed.is_none());
    }

    #[test]
    fn refresh_resigns_past_the_cadence() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Issued ten minutes ago, still far from expiry.
        let token = encode_raw(&keys, now - 600, now + 86_400);
        let refreshed = keys.refresh(&token).expect("refresh");
        let new_token = refreshed.expect("should re-sign");
        let claims = keys.verify(&new_token).expect("verify refreshed");
        assert!(claims.iat as i64 >= now);
    }

    #[test]
    fn refresh_rejects_expired_or_garbage_tokens() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let expired = encode_raw(&keys, now - 7200, now - 3600);
        assert!(keys.refresh(&expired).is_err());
        assert!(keys.refresh("not-a-token").is_err());
    }
}
