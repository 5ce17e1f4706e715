use std::collections::BTreeSet;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use utoipa::ToSchema;

use super::claims::{Claims, Role};
use crate::config::{JwtConfig, MAX_TTL_MINUTES};

/// Signing and verification keys, built once from [`JwtConfig`].
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

/// Signed access token plus its expiry in epoch milliseconds.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: i64,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes.clamp(1, MAX_TTL_MINUTES)),
        }
    }

    pub fn issue(&self, subject: &str, roles: &[Role]) -> anyhow::Result<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(self.ttl)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?
            .unix_timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
            iat: now.unix_timestamp() as usize,
            exp: exp as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let access_token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject = %subject, "jwt signed");
        Ok(IssuedToken {
            access_token,
            expires_at: exp * 1000,
        })
    }

    /// Returns `None` for any token that does not check out: bad signature,
    /// malformed, expired, or minted for another issuer/audience.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(subject = %data.claims.sub, "jwt verified");
                Some(data.claims)
            }
            Err(e) => {
                debug!(error = %e, "jwt rejected");
                None
            }
        }
    }
}
