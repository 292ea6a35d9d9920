// Patient record persistence

use async_trait::async_trait;
use sqlx::PgPool;

use crate::patients::error::PatientError;
use crate::patients::models::{CreatePatient, Patient, UpdatePatient};

/// Persistence abstraction for patient records
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create(&self, patient: CreatePatient) -> Result<Patient, PatientError>;
    async fn find_all(&self) -> Result<Vec<Patient>, PatientError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Patient>, PatientError>;
    async fn update(&self, id: i32, patient: UpdatePatient) -> Result<Patient, PatientError>;
    async fn delete(&self, id: i32) -> Result<bool, PatientError>;
}

/// Postgres-backed patient store
pub struct PgPatientStore {
    pool: PgPool,
}

impl PgPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    async fn create(&self, patient: CreatePatient) -> Result<Patient, PatientError> {
        sqlx::query_as::<_, Patient>(
            "INSERT INTO patients (name, email, date_of_birth, notes) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, date_of_birth, notes, created_at",
        )
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(patient.date_of_birth)
        .bind(&patient.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return PatientError::EmailTaken(patient.email.clone());
                }
            }
            PatientError::Database(e.to_string())
        })
    }

    async fn find_all(&self) -> Result<Vec<Patient>, PatientError> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, email, date_of_birth, notes, created_at FROM patients ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PatientError::Database(e.to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Patient>, PatientError> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, email, date_of_birth, notes, created_at FROM patients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PatientError::Database(e.to_string()))
    }

    async fn update(&self, id: i32, patient: UpdatePatient) -> Result<Patient, PatientError> {
        // Transaction so the exists-check and the update are atomic
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        let existing = sqlx::query_as::<_, Patient>(
            "SELECT id, name, email, date_of_birth, notes, created_at FROM patients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| PatientError::Database(e.to_string()))?
        .ok_or(PatientError::NotFound(id))?;

        let email = patient.email.unwrap_or(existing.email);

        let updated = sqlx::query_as::<_, Patient>(
            "UPDATE patients SET name = $1, email = $2, date_of_birth = $3, notes = $4 \
             WHERE id = $5 RETURNING id, name, email, date_of_birth, notes, created_at",
        )
        .bind(patient.name.unwrap_or(existing.name))
        .bind(&email)
        .bind(patient.date_of_birth.unwrap_or(existing.date_of_birth))
        .bind(patient.notes.or(existing.notes))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return PatientError::EmailTaken(email.clone());
                }
            }
            PatientError::Database(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, PatientError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
