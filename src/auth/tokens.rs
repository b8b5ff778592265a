use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, error::AuthError, state::AppState};

/// One-shot confirmation / reset identifier. UUID v4 gives the collision
/// resistance and unpredictability the flow needs; stored until consumed.
pub fn one_shot_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Session payload: user identity plus the standard time/issuer claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub nombre: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Signing and verification material for the `_token` session cookie.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

impl SessionKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::from_secs((config.ttl_minutes.max(1) as u64) * 60),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }

    pub fn sign(&self, user_id: Uuid, name: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = SessionClaims {
            sub: user_id,
            nombre: name.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session token signed");
        Ok(token)
    }

    /// Rejects bad signatures, wrong issuer/audience and expired tokens.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_audience(std::slice::from_ref(&self.audience));
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidSession)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: "bienesraices".into(),
            audience: "bienesraices-users".into(),
            ttl_minutes: 60 * 24,
        }
    }

    #[test]
    fn one_shot_tokens_do_not_repeat() {
        let a = one_shot_token();
        let b = one_shot_token();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let keys = SessionKeys::new(&test_config("dev-secret"));
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "Ivor").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.nombre, "Ivor");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_garbage_and_wrong_secret() {
        let keys = SessionKeys::new(&test_config("dev-secret"));
        assert!(matches!(
            keys.verify("not-a-jwt"),
            Err(AuthError::InvalidSession)
        ));

        let other = SessionKeys::new(&test_config("another-secret"));
        let token = other.sign(Uuid::new_v4(), "Ivor").expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidSession)));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let config = test_config("dev-secret");
        let keys = SessionKeys::new(&config);
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Signed with the same secret but already five minutes past expiry,
        // beyond the default leeway.
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            nombre: "Ivor".into(),
            iat: (now - 600) as usize,
            exp: (now - 300) as usize,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encode");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidSession)));
    }

    #[test]
    fn verify_rejects_wrong_issuer() {
        let mut other_config = test_config("dev-secret");
        other_config.issuer = "someone-else".into();
        let other = SessionKeys::new(&other_config);
        let keys = SessionKeys::new(&test_config("dev-secret"));
        let token = other.sign(Uuid::new_v4(), "Ivor").expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidSession)));
    }
}
