// Authentication module
// JWT-based sign-up, sign-in, token refresh, and profile retrieval

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{profile_handler, refresh_handler, signin_handler, signup_handler};
pub use middleware::AuthenticatedUser;
pub use models::{
    ProfileResponse, RefreshRequest, RefreshResponse, Role, SignInRequest, SignInResponse,
    SignUpRequest, SignUpResponse, User,
};
pub use service::{AuthService, CredentialVerifier};
pub use store::{CredentialStore, PgCredentialStore};
pub use token::TokenService;
