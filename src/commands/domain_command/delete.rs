use serde_json::json;
use tracing::{info, instrument};

use crate::api_client::{call_driver_unit, PlatformApi};
use crate::errors::PuterError;
use crate::models::SUBDOMAINS_INTERFACE;

#[derive(Debug, thiserror::Error)]
pub enum SubdomainDeleteError {
    #[error("Subdomain not found: {0}")]
    NotFound(String),
    #[error("Failed to delete subdomain '{id}': {source}")]
    Failed {
        id: String,
        #[source]
        source: PuterError,
    },
}

/// Delete a single subdomain by its uid
#[instrument(skip(api))]
pub async fn delete_one(api: &dyn PlatformApi, id: &str) -> Result<(), SubdomainDeleteError> {
    call_driver_unit(
        api,
        SUBDOMAINS_INTERFACE,
        "delete",
        json!({ "id": { "uid": id } }),
    )
    .await
    .map_err(|e| {
        if e.is_not_found() {
            SubdomainDeleteError::NotFound(id.to_string())
        } else {
            SubdomainDeleteError::Failed {
                id: id.to_string(),
                source: e,
            }
        }
    })?;

    info!("Deleted subdomain '{}'", id);
    Ok(())
}

/// Delete subdomains in order, stopping at the first failure.
///
/// Ids after a failed one are not attempted. Returns the number deleted.
#[instrument(skip(api))]
pub async fn execute(api: &dyn PlatformApi, ids: &[String]) -> Result<usize, SubdomainDeleteError> {
    for id in ids {
        delete_one(api, id).await?;
        println!("Subdomain '{}' deleted successfully", id);
    }

    Ok(ids.len())
}
