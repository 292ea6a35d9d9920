// JWT issuance and validation for session and refresh tokens

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::error::AuthError;
use crate::auth::models::{Role, User};

/// JWT claims structure
///
/// The subject is the user's email (the unique identifier in the credential
/// store). Refresh tokens may carry caller-supplied extra claims, captured
/// by the flattened map.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Token service issuing and validating signed tokens
///
/// Tokens are stateless: nothing is stored server-side, and a token cannot
/// be revoked before its natural expiry. Session tokens live 24 hours,
/// refresh tokens 7 days.
pub struct TokenService {
    secret: String,
    session_token_duration: i64, // in seconds
    refresh_token_duration: i64, // in seconds
}

/// Fixed expiration label returned to clients, matching the 24 hour session window
pub const EXPIRATION_LABEL: &str = "24Hr";

impl TokenService {
    /// Create a new TokenService with the signing secret
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            session_token_duration: 86_400,   // 24 hours
            refresh_token_duration: 604_800,  // 7 days
        }
    }

    /// Generate a session token bound to the user's email and role
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        self.issue(user, self.session_token_duration, HashMap::new())
    }

    /// Generate a refresh token, merging caller-supplied extra claims
    pub fn generate_refresh_token(
        &self,
        extra_claims: HashMap<String, serde_json::Value>,
        user: &User,
    ) -> Result<String, AuthError> {
        self.issue(user, self.refresh_token_duration, extra_claims)
    }

    fn issue(
        &self,
        user: &User,
        duration: i64,
        extra: HashMap<String, serde_json::Value>,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + duration,
            extra,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Decode the subject (email) claim without verifying signature or expiry
    ///
    /// Used only to locate the candidate user before full validation; never
    /// treat the result as authenticated.
    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Fully validate a token against a user: signature, expiry (zero
    /// leeway), and subject match
    pub fn validate_for_user(&self, token: &str, user: &User) -> Result<Claims, AuthError> {
        let claims = self.validate(token)?;

        if claims.sub != user.email {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Validate signature and expiry, returning the decoded claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }

    /// True iff the token is correctly signed, unexpired, and bound to this user
    pub fn is_token_valid(&self, token: &str, user: &User) -> bool {
        self.validate_for_user(token, user).is_ok()
    }
}
