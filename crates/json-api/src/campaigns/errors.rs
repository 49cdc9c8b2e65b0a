//! Campaign Errors

use salvo::http::StatusError;
use tracing::error;

use tessera_app::domain::campaigns::CampaignsServiceError;

pub(crate) fn into_status_error(error: CampaignsServiceError) -> StatusError {
    match error {
        CampaignsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Campaign already exists")
        }
        CampaignsServiceError::InvalidTransition { from, to } => StatusError::conflict()
            .brief(format!("Cannot transition campaign from {from} to {to}")),
        CampaignsServiceError::InvalidReference
        | CampaignsServiceError::MissingRequiredData
        | CampaignsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid campaign payload")
        }
        CampaignsServiceError::NotFound => StatusError::not_found().brief("Campaign not found"),
        CampaignsServiceError::Sql(source) => {
            error!("campaign storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
