// Bearer-token extraction for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Authenticated subject extracted from the Authorization header
///
/// Handlers take this as an argument to require a valid session token;
/// the subject email is then passed explicitly into the service layer.
/// Tokens are checked against the application's shared token service,
/// pulled from state, so extraction and issuance always agree on the
/// signing secret.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate(token)?;

        debug!("Authenticated subject {}", claims.sub);

        Ok(AuthenticatedUser {
            email: claims.sub,
            role: claims.role,
        })
    }
}

impl AuthenticatedUser {
    /// Require the admin role, for destructive endpoints
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::User;
    use crate::auth::token::Claims;
    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_state() -> Arc<TokenService> {
        Arc::new(TokenService::new(TEST_SECRET.to_string()))
    }

    fn parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn test_user(email: &str, role: Role) -> User {
        User {
            id: 1,
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_valid_token_yields_subject_and_role() {
        let state = test_state();
        let token = state
            .generate_token(&test_user("ada@example.com", Role::Admin))
            .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::Admin);
        assert!(user.require_admin().is_ok());
    }

    #[tokio::test]
    async fn test_patient_role_is_not_admin() {
        let state = test_state();
        let token = state
            .generate_token(&test_user("ada@example.com", Role::Patient))
            .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert!(user.require_admin().is_err());
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let mut parts = parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_state()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "ada@example.com".to_string(),
            role: Role::Patient,
            iat: Utc::now().timestamp() - 1_000,
            exp: Utc::now().timestamp() - 500,
            extra: Default::default(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_state()).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        // A token minted by a differently-configured service must not pass
        let other = TokenService::new("some_other_secret".to_string());
        let token = other
            .generate_token(&test_user("ada@example.com", Role::Patient))
            .unwrap();

        let mut parts = parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_state()).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_non_bearer_schemes_are_rejected() {
        for auth_value in ["Basic dXNlcjpwYXNz", "token_without_bearer", "Bearer"] {
            let mut parts = parts_with_auth(auth_value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &test_state()).await;
            assert!(result.is_err());
        }
    }
}
