//! Session token errors.

use thiserror::Error;

/// Why a bearer token could not be turned into a session.
///
/// Never sent to clients: the context middleware logs the reason and answers
/// with the generic denial.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signature, structure or claims did not verify.
    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session token expired")]
    TokenExpired,

    /// `Authorization` header present but not `Bearer <token>`.
    #[error("Malformed authorization header")]
    InvalidAuthHeader,

    /// Configured signing or verification key is unusable.
    #[error("Token key misconfigured: {0}")]
    Key(String),

    /// Encoding an act-as or plain token failed.
    #[error("Token encoding failed")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;
