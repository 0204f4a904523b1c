use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";
const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Claims of an access token issued by the identity service. Only `sub` is
/// used here; the rest is checked by validation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub(crate) sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug)]
pub enum TokenError {
    Rejected(jsonwebtoken::errors::Error),
    WrongType(String),
    BadSubject,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Rejected(err) => write!(f, "{}", err),
            TokenError::WrongType(typ) => write!(f, "token type {:?} is not accepted", typ),
            TokenError::BadSubject => write!(f, "token subject is not a user id"),
        }
    }
}

/// Verification settings for HS256 access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
            audience: None,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn from_env(secret: String) -> Self {
        let leeway_secs = std::env::var("JWT_LEEWAY_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_LEEWAY_SECS);
        Self {
            issuer: non_empty_env("JWT_ISSUER"),
            audience: non_empty_env("JWT_AUDIENCE"),
            leeway_secs,
            ..Self::new(secret)
        }
    }

    /// Verifies signature, expiry and the optional issuer/audience, then
    /// returns the user id carried in `sub`. A configured issuer or audience
    /// makes the matching claim mandatory.
    pub fn verify_subject(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
            validation.required_spec_claims.insert("aud".to_string());
        }

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(TokenError::Rejected)?
        .claims;

        match claims.typ.as_deref() {
            None | Some(ACCESS_TOKEN_TYPE) => {}
            Some(other) => return Err(TokenError::WrongType(other.to_string())),
        }

        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::BadSubject)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Token minting for tests; production tokens come from the identity service.
#[cfg(test)]
pub(crate) fn sign_for_tests(config: &JwtConfig, sub: &str, typ: Option<&str>) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
        typ: typ.map(str::to_string),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap()
}
