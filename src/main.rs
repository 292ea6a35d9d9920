pub mod auth;
pub mod db;
pub mod patients;
pub mod validation;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, PgCredentialStore, TokenService};
use patients::{CreatePatient, Patient, PatientStore, PgPatientStore, UpdatePatient};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        patients::handlers::create_patient,
        patients::handlers::get_all_patients,
        patients::handlers::get_patient_by_id,
        patients::handlers::update_patient,
        patients::handlers::delete_patient,
    ),
    components(
        schemas(Patient, CreatePatient, UpdatePatient)
    ),
    tags(
        (name = "patients", description = "Patient record management endpoints")
    ),
    info(
        title = "Patient Records API",
        version = "1.0.0",
        description = "RESTful API for patient registration, authentication, and record management"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tokens: Arc<TokenService>,
    pub patients: Arc<dyn PatientStore>,
}

/// Lets the authentication extractor borrow the shared token service,
/// so validation uses the same instance that issues tokens
impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes
        .route("/api/auth/signup", post(auth::signup_handler))
        .route("/api/auth/signin", post(auth::signin_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/profile", get(auth::profile_handler))
        // Patient routes
        .route(
            "/api/patients",
            post(patients::create_patient).get(patients::get_all_patients),
        )
        .route(
            "/api/patients/:id",
            get(patients::get_patient_by_id)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Patient Records API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let credential_store = Arc::new(PgCredentialStore::new(db_pool.clone()));
    let token_service = Arc::new(TokenService::new(jwt_secret));
    let state = AppState {
        auth: AuthService::new(credential_store, token_service.clone()),
        tokens: token_service,
        patients: Arc::new(PgPatientStore::new(db_pool)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Patient Records API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
