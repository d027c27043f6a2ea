//! JWT Token Generation and Validation
//!
//! Uses EdDSA (Ed25519). Tokens are issued by the identity provider at login
//! and by this server for impersonation (act-as tokens); both are verified
//! with the same public key.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (authenticated user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Token ID.
    pub jti: String,
    /// Act-as claim, present only on impersonation tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<ActAs>,
}

/// Identity a token acts as during impersonation.
///
/// The underlying subject stays in `sub` and is repeated in `original_sub`
/// so a tampered or mismatched claim can be detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActAs {
    /// Impersonated role identifier.
    pub role: String,
    /// Impersonated club scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<Uuid>,
    /// Subject of the administrator who started the impersonation.
    pub original_sub: String,
}

/// Issued access token.
#[derive(Debug)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub access_token: String,
    /// Validity in seconds.
    pub expires_in: i64,
    /// Token ID (`jti`), recorded in the audit log.
    pub token_id: Uuid,
}

/// Decode a base64-encoded PEM key.
fn decode_pem_key(base64_key: &str) -> AuthResult<Vec<u8>> {
    STANDARD
        .decode(base64_key)
        .map_err(|_| AuthError::Key("key is not valid base64".to_string()))
}

/// Generate an access token.
///
/// # Arguments
/// * `user_id` - The authenticated user's UUID
/// * `act` - Act-as claim for impersonation tokens
/// * `private_key` - Ed25519 private key (PEM format, base64-encoded)
/// * `expiry_seconds` - Token validity
pub fn generate_access_token(
    user_id: Uuid,
    act: Option<ActAs>,
    private_key: &str,
    expiry_seconds: i64,
) -> AuthResult<IssuedToken> {
    let now = Utc::now();
    let token_id = Uuid::now_v7();

    let key_bytes = decode_pem_key(private_key)?;
    let encoding_key = EncodingKey::from_ed_pem(&key_bytes)
        .map_err(|e| AuthError::Key(format!("private key: {e}")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        iat: now.timestamp(),
        jti: token_id.to_string(),
        act,
    };

    let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &encoding_key)?;

    Ok(IssuedToken {
        access_token,
        expires_in: expiry_seconds,
        token_id,
    })
}

/// Validate and decode an access token.
pub fn validate_access_token(token: &str, public_key: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.validate_exp = true;
    validation.leeway = 0;

    let key_bytes = decode_pem_key(public_key)?;
    let decoding_key = DecodingKey::from_ed_pem(&key_bytes)
        .map_err(|e| AuthError::Key(format!("public key: {e}")))?;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind()
    {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
