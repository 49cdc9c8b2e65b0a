//! Redemption Errors

use salvo::http::StatusError;
use tracing::error;

use tessera_app::domain::redemptions::RedemptionsServiceError;

pub(crate) fn into_status_error(error: RedemptionsServiceError) -> StatusError {
    match error {
        RedemptionsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Redemption already exists")
        }
        RedemptionsServiceError::AlreadyReversed => {
            StatusError::conflict().brief("Redemption was already reversed")
        }
        RedemptionsServiceError::InvalidReference
        | RedemptionsServiceError::MissingRequiredData
        | RedemptionsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid redemption payload")
        }
        RedemptionsServiceError::NotFound => {
            StatusError::not_found().brief("Redemption not found")
        }
        RedemptionsServiceError::Sql(source) => {
            error!("redemption storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
