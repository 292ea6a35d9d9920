// HTTP handlers for patient record endpoints
// All routes require a valid session token; delete additionally requires ADMIN

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::patients::error::PatientError;
use crate::patients::models::{CreatePatient, Patient, UpdatePatient};
use crate::AppState;

/// Create a new patient record
#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = CreatePatient,
    responses(
        (status = 201, description = "Patient created successfully", body = Patient),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Patient email already exists")
    ),
    tag = "patients"
)]
pub async fn create_patient(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePatient>,
) -> Result<(StatusCode, Json<Patient>), PatientError> {
    tracing::debug!("User {} creating patient {}", user.email, payload.email);

    payload
        .validate()
        .map_err(|e| PatientError::Validation(e.to_string()))?;

    let patient = state.patients.create(payload).await?;

    tracing::info!("Created patient with id {}", patient.id);
    Ok((StatusCode::CREATED, Json(patient)))
}

/// List all patient records
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of all patients", body = Vec<Patient>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "patients"
)]
pub async fn get_all_patients(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Patient>>, PatientError> {
    let patients = state.patients.find_all().await?;
    tracing::debug!("Retrieved {} patients", patients.len());
    Ok(Json(patients))
}

/// Fetch a patient record by id
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Patient not found")
    ),
    tag = "patients"
)]
pub async fn get_patient_by_id(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Patient>, PatientError> {
    let patient = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or(PatientError::NotFound(id))?;

    Ok(Json(patient))
}

/// Update a patient record; omitted fields keep their current values
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    request_body = UpdatePatient,
    responses(
        (status = 200, description = "Patient updated successfully", body = Patient),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Patient not found"),
        (status = 409, description = "Patient email already exists")
    ),
    tag = "patients"
)]
pub async fn update_patient(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePatient>,
) -> Result<Json<Patient>, PatientError> {
    tracing::debug!("User {} updating patient {}", user.email, id);

    payload
        .validate()
        .map_err(|e| PatientError::Validation(e.to_string()))?;

    let patient = state.patients.update(id, payload).await?;
    tracing::info!("Updated patient with id {}", id);
    Ok(Json(patient))
}

/// Delete a patient record (ADMIN only)
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Patient deleted successfully"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Requires ADMIN role"),
        (status = 404, description = "Patient not found")
    ),
    tag = "patients"
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, PatientError> {
    user.require_admin().map_err(|_| PatientError::Forbidden)?;

    if !state.patients.delete(id).await? {
        return Err(PatientError::NotFound(id));
    }

    tracing::info!("User {} deleted patient {}", user.email, id);
    Ok(StatusCode::NO_CONTENT)
}
