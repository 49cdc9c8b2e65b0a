//! Code Errors

use salvo::http::StatusError;
use tracing::error;

use tessera_app::domain::codes::CodesServiceError;

pub(crate) fn into_status_error(error: CodesServiceError) -> StatusError {
    match error {
        CodesServiceError::AlreadyExists => StatusError::conflict().brief("Code already exists"),
        CodesServiceError::CodeAlreadyExists { code } => {
            StatusError::conflict().brief(format!("Code '{code}' already exists in this campaign"))
        }
        CodesServiceError::AttemptsExhausted { attempts } => StatusError::conflict().brief(
            format!("Could not draw an unused code after {attempts} attempts"),
        ),
        CodesServiceError::JobNotResumable { status } => {
            StatusError::conflict().brief(format!("Job cannot be resumed from status {status}"))
        }
        CodesServiceError::JobNotCancellable { status } => {
            StatusError::conflict().brief(format!("Job cannot be cancelled from status {status}"))
        }
        CodesServiceError::NotFound => StatusError::not_found().brief("Code not found"),
        CodesServiceError::InvalidReference
        | CodesServiceError::MissingRequiredData
        | CodesServiceError::InvalidData => StatusError::bad_request().brief("Invalid code payload"),
        CodesServiceError::Sql(source) => {
            error!("code storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
