use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;

/// Public directory entry: a doctor joined with the location of their hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub speciality: String,
    pub experience: i32,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    #[error("No doctors found with the specified speciality")]
    NoDoctors,

    #[error("Location error")]
    LocationNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        DirectoryError::DatabaseError(err.to_string())
    }
}
