// Patient record models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Patient database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Patient creation request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePatient {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub notes: Option<String>,
}

/// Patient update request DTO; omitted fields keep their current values
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePatient {
    #[validate(custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub notes: Option<String>,
}
