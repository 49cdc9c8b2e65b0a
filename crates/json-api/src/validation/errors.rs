//! Validation Errors

use salvo::http::StatusError;
use tracing::error;

use tessera_app::domain::validation::ValidationServiceError;

pub(crate) fn into_status_error(error: ValidationServiceError) -> StatusError {
    match error {
        ValidationServiceError::AlreadyExists => {
            StatusError::conflict().brief("Validation attempt already recorded")
        }
        ValidationServiceError::InvalidReference
        | ValidationServiceError::MissingRequiredData
        | ValidationServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid validation payload")
        }
        ValidationServiceError::NotFound => StatusError::not_found().brief("Code not found"),
        ValidationServiceError::Sql(source) => {
            error!("validation storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
