// Authentication service: sign-up, sign-in, token refresh, profile lookup

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{
    error::AuthError,
    models::{
        NewUser, ProfileResponse, RefreshRequest, RefreshResponse, SignInRequest,
        SignInResponse, SignUpRequest, SignUpResponse,
    },
    password::PasswordService,
    store::CredentialStore,
    token::{TokenService, EXPIRATION_LABEL},
};

/// Pluggable credential check used by sign-in
///
/// The default implementation composes a store lookup with a password hash
/// verification; a transport layer with its own authentication mechanism
/// can substitute another.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Succeeds iff the email exists and the password matches its stored hash
    async fn check(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

/// Default verifier over the credential store
pub struct StoreCredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl StoreCredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialVerifier for StoreCredentialVerifier {
    async fn check(&self, email: &str, password: &str) -> Result<(), AuthError> {
        // Unknown email and wrong password are indistinguishable to the caller
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if PasswordService::verify_password(password, &user.password_hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Authentication service coordinating store, hasher, and token issuer
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn CredentialVerifier>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Create an AuthService with the default store-backed verifier
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        let verifier = Arc::new(StoreCredentialVerifier::new(store.clone()));
        Self {
            store,
            verifier,
            tokens,
        }
    }

    /// Create an AuthService with a custom credential verifier
    pub fn with_verifier(
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn CredentialVerifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            verifier,
            tokens,
        }
    }

    /// Register a new user
    ///
    /// The blank-password check runs before any store access, so a rejected
    /// sign-up performs no write.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, AuthError> {
        if request.password.trim().is_empty() {
            return Err(AuthError::PasswordBlank);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;

        let saved = self
            .store
            .save(NewUser {
                name: request.name,
                email: request.email,
                password_hash,
                role: request.role,
            })
            .await?;

        info!("Registered user {} with id {}", saved.email, saved.id);

        Ok(SignUpResponse {
            user: saved.into(),
            message: "User saved successfully.".to_string(),
        })
    }

    /// Authenticate a user and issue a session token plus a refresh token
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SignInResponse, AuthError> {
        self.verifier.check(&request.email, &request.password).await?;

        // The verifier just confirmed the email exists; absence here means
        // the user vanished between the two lookups
        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self.tokens.generate_token(&user)?;
        let refresh_token = self.tokens.generate_refresh_token(HashMap::new(), &user)?;

        debug!("Issued token pair for {}", user.email);

        Ok(SignInResponse {
            token,
            refresh_token,
            expiration_time: EXPIRATION_LABEL.to_string(),
            role: user.role,
            message: "Signed in successfully.".to_string(),
        })
    }

    /// Mint a fresh session token from a valid refresh token
    ///
    /// The subject is decoded without verification only to locate the
    /// candidate user; the refresh token must then pass full signature,
    /// expiry, and subject-match validation, and any failure is surfaced
    /// as an error rather than a partial response.
    pub async fn refresh_token(
        &self,
        request: RefreshRequest,
    ) -> Result<RefreshResponse, AuthError> {
        let subject = self.tokens.extract_subject(&request.refresh_token)?;

        let user = self
            .store
            .find_by_email(&subject)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.tokens
            .validate_for_user(&request.refresh_token, &user)?;

        let token = self.tokens.generate_token(&user)?;

        debug!("Refreshed session token for {}", user.email);

        Ok(RefreshResponse {
            token,
            refresh_token: request.refresh_token,
            expiration_time: EXPIRATION_LABEL.to_string(),
            message: "Refreshed token successfully.".to_string(),
        })
    }

    /// Look up the profile of the authenticated subject
    ///
    /// The subject email is passed in explicitly by the transport layer.
    /// The response carries no credential material.
    pub async fn profile(&self, subject: &str) -> Result<ProfileResponse, AuthError> {
        let user = self
            .store
            .find_by_email(subject)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(ProfileResponse {
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::auth::store::testing::InMemoryCredentialStore;
    use crate::auth::token::Claims;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_service() -> (Arc<InMemoryCredentialStore>, AuthService) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string()));
        let service = AuthService::new(store.clone(), tokens);
        (store, service)
    }

    fn sign_up_request(email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Patient,
        }
    }

    #[tokio::test]
    async fn test_sign_up_assigns_id_and_hashes_password() {
        let (_, service) = test_service();

        let response = service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        assert!(response.user.id > 0);
        assert_eq!(response.user.email, "ada@example.com");
        assert_eq!(response.message, "User saved successfully.");
    }

    #[tokio::test]
    async fn test_sign_up_stores_hash_not_plaintext() {
        let (store, service) = test_service();

        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let stored = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert!(!stored.password_hash.is_empty());
        assert_ne!(stored.password_hash, "s3cret-pass");
    }

    #[tokio::test]
    async fn test_sign_up_blank_password_writes_nothing() {
        let (store, service) = test_service();

        for blank in ["", "   ", "\t\n"] {
            let result = service.sign_up(sign_up_request("ada@example.com", blank)).await;
            assert!(matches!(result, Err(AuthError::PasswordBlank)));
        }
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_conflicts() {
        let (_, service) = test_service();

        service
            .sign_up(sign_up_request("ada@example.com", "first-pass"))
            .await
            .unwrap();
        let result = service
            .sign_up(sign_up_request("ada@example.com", "second-pass"))
            .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_sign_in_issues_valid_token_pair() {
        let (store, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let response = service
            .sign_in(SignInRequest {
                email: "ada@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        let user = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        let tokens = TokenService::new(TEST_SECRET.to_string());
        assert!(tokens.is_token_valid(&response.token, &user));
        assert!(tokens.is_token_valid(&response.refresh_token, &user));
        assert_eq!(response.expiration_time, "24Hr");
        assert_eq!(response.role, Role::Patient);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_fails() {
        let (_, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let result = service
            .sign_in(SignInRequest {
                email: "ada@example.com".to_string(),
                password: "wrong-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email_fails() {
        let (_, service) = test_service();

        let result = service
            .sign_in(SignInRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_mints_new_session_token() {
        let (store, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();
        let signed_in = service
            .sign_in(SignInRequest {
                email: "ada@example.com".to_string(),
                password: "s3cret-pass".to_string(),
            })
            .await
            .unwrap();

        let refreshed = service
            .refresh_token(RefreshRequest {
                refresh_token: signed_in.refresh_token.clone(),
            })
            .await
            .unwrap();

        // Original refresh token echoed back unchanged
        assert_eq!(refreshed.refresh_token, signed_in.refresh_token);

        let user = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        let tokens = TokenService::new(TEST_SECRET.to_string());
        assert!(tokens.is_token_valid(&refreshed.token, &user));
        assert_eq!(
            tokens.extract_subject(&refreshed.token).unwrap(),
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn test_refresh_tampered_token_fails_loudly() {
        let (_, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        // Signed with the wrong secret: subject resolves but validation fails
        let forged = encode(
            &Header::default(),
            &Claims {
                sub: "ada@example.com".to_string(),
                role: Role::Patient,
                iat: Utc::now().timestamp(),
                exp: Utc::now().timestamp() + 600,
                extra: Default::default(),
            },
            &EncodingKey::from_secret(b"attacker_secret"),
        )
        .unwrap();

        let result = service
            .refresh_token(RefreshRequest {
                refresh_token: forged,
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_expired_token_fails_loudly() {
        let (_, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let expired = encode(
            &Header::default(),
            &Claims {
                sub: "ada@example.com".to_string(),
                role: Role::Patient,
                iat: Utc::now().timestamp() - 1_000,
                exp: Utc::now().timestamp() - 500,
                extra: Default::default(),
            },
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let result = service
            .refresh_token(RefreshRequest {
                refresh_token: expired,
            })
            .await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_refresh_unknown_subject_fails() {
        let (_, service) = test_service();

        let tokens = TokenService::new(TEST_SECRET.to_string());
        let ghost = crate::auth::models::User {
            id: 1,
            name: "Ghost".to_string(),
            email: "ghost@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role: Role::Patient,
            created_at: Utc::now(),
        };
        let token = tokens.generate_refresh_token(HashMap::new(), &ghost).unwrap();

        let result = service
            .refresh_token(RefreshRequest {
                refresh_token: token,
            })
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_profile_returns_stored_identity_without_hash() {
        let (_, service) = test_service();
        service
            .sign_up(sign_up_request("ada@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let profile = service.profile("ada@example.com").await.unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.role, Role::Patient);

        let serialized = serde_json::to_string(&profile).unwrap();
        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("hash"));
    }

    #[tokio::test]
    async fn test_profile_unknown_subject_fails() {
        let (_, service) = test_service();
        let result = service.profile("nobody@example.com").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }
}
