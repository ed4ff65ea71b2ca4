//! HS256 tokens for staff and customers.
//!
//! Staff requests carry an access token ([`Claims`]) minted by the identity
//! provider with the shared secret. Customers receive a review session token
//! ([`ReviewClaims`]) from the batch unlock endpoint; its subject is the
//! batch id, so a session can never act on another batch.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use proofdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope claim carried by every review session token.
pub const REVIEW_SCOPE: &str = "artwork_review";

/// JWT claims embedded in every staff access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the staff member's id at the identity provider.
    pub sub: String,
    /// The staff member's role name (e.g. `"admin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// JWT claims of a customer review session.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewClaims {
    /// Subject -- the unlocked batch id.
    pub sub: DbId,
    /// Review session id, fresh for every unlock.
    pub sid: Uuid,
    /// Password generation of the batch at unlock.
    pub pwv: i32,
    /// Always [`REVIEW_SCOPE`].
    pub scope: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Configuration for JWT generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Staff access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Review session lifetime in minutes (default: 120).
    pub review_session_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default review session expiry in minutes.
const DEFAULT_REVIEW_SESSION_EXPIRY_MINS: i64 = 120;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `JWT_SECRET`                 | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`     | no       | `15`    |
    /// | `REVIEW_SESSION_EXPIRY_MINS` | no       | `120`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let review_session_expiry_mins: i64 = std::env::var("REVIEW_SESSION_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_REVIEW_SESSION_EXPIRY_MINS.to_string())
            .parse()
            .expect("REVIEW_SESSION_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            review_session_expiry_mins,
        }
    }
}

/// Generate an HS256 staff access token.
///
/// Production tokens come from the identity provider; this is used by
/// tooling and tests that share the secret.
pub fn generate_access_token(
    subject: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a staff access token.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// A freshly issued review session.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedReviewSession {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Issue a review session token for an unlocked batch.
///
/// `password_version` is the batch's password generation; the session stops
/// being accepted once the password is replaced.
pub fn issue_review_token(
    batch_id: DbId,
    password_version: i32,
    config: &JwtConfig,
) -> Result<IssuedReviewSession, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::minutes(config.review_session_expiry_mins);
    let claims = ReviewClaims {
        sub: batch_id,
        sid: Uuid::new_v4(),
        pwv: password_version,
        scope: REVIEW_SCOPE.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedReviewSession {
        token,
        session_id: claims.sid,
        expires_at,
    })
}

/// Validate and decode a review session token.
///
/// Tokens without the review scope (e.g. staff tokens) are rejected.
pub fn validate_review_token(
    token: &str,
    config: &JwtConfig,
) -> Result<ReviewClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<ReviewClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    if token_data.claims.scope != REVIEW_SCOPE {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(token_data.claims)
}
