//! Codes service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::codes::records::JobStatus;

#[derive(Debug, Error)]
pub enum CodesServiceError {
    #[error("code already exists")]
    AlreadyExists,

    #[error("code '{code}' already exists in this campaign")]
    CodeAlreadyExists { code: String },

    #[error("could not draw an unused code after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error("job cannot be resumed from status {status}")]
    JobNotResumable { status: JobStatus },

    #[error("job cannot be cancelled from status {status}")]
    JobNotCancellable { status: JobStatus },

    #[error("code not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CodesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
