// Patient records module
// CRUD persistence for patient records behind authenticated endpoints

pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

pub use error::PatientError;
pub use handlers::{
    create_patient, delete_patient, get_all_patients, get_patient_by_id, update_patient,
};
pub use models::{CreatePatient, Patient, UpdatePatient};
pub use store::{PatientStore, PgPatientStore};
