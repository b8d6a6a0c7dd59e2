use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::api_client::PlatformApi;
use crate::commands::domain_command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteDeleteStatus {
    Deleted,
    MaybeAlreadyDeleted,
}

#[derive(Debug, Clone)]
pub struct SiteDeletion {
    pub uuid: String,
    pub status: SiteDeleteStatus,
}

impl std::fmt::Display for SiteDeletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            SiteDeleteStatus::Deleted => write!(f, "Site '{}' deleted successfully", self.uuid),
            SiteDeleteStatus::MaybeAlreadyDeleted => write!(
                f,
                "Site '{}' could not be confirmed as deleted; it may already be deleted",
                self.uuid
            ),
        }
    }
}

/// Delete hosted sites one at a time.
///
/// Each site uuid is also released as a subdomain uid. An empty response
/// body from the site endpoint counts as success.
#[instrument(skip(api))]
pub async fn execute(api: &dyn PlatformApi, uuids: &[String]) -> Vec<SiteDeletion> {
    let mut deletions = Vec::with_capacity(uuids.len());

    for uuid in uuids {
        let response = api.delete_site(uuid).await;

        if let Err(e) = domain_command::delete::delete_one(api, uuid).await {
            warn!("Could not release subdomain for site '{}': {}", uuid, e);
        }

        let status = match response {
            Ok(body) if is_empty_body(&body) => SiteDeleteStatus::Deleted,
            Ok(body) => {
                info!("Unexpected delete-site response for '{}': {}", uuid, body);
                SiteDeleteStatus::MaybeAlreadyDeleted
            }
            Err(e) => {
                warn!("Failed to delete site '{}': {}", uuid, e);
                SiteDeleteStatus::MaybeAlreadyDeleted
            }
        };

        let deletion = SiteDeletion {
            uuid: uuid.clone(),
            status,
        };
        println!("{}", deletion);
        deletions.push(deletion);
    }

    deletions
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::SUBDOMAINS_INTERFACE;
    use crate::tests::test_utils::{Call, FakeApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_body_is_success_and_subdomain_is_released() {
        let api = FakeApi::new("alice");
        api.on_delete_site(json!({}))
            .on_driver_ok(SUBDOMAINS_INTERFACE, "delete", json!({}));

        let got = execute(&api, &["site-1".to_string()]).await;

        assert_eq!(got[0].status, SiteDeleteStatus::Deleted);
        assert_eq!(
            api.calls()[0..2],
            [
                Call::DeleteSite("site-1".to_string()),
                Call::Driver {
                    interface: SUBDOMAINS_INTERFACE.to_string(),
                    method: "delete".to_string(),
                    args: json!({ "id": { "uid": "site-1" } }),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_non_empty_body_is_ambiguous() {
        let api = FakeApi::new("alice");
        api.on_delete_site(json!({ "message": "nothing to delete" }));

        let got = execute(&api, &["site-1".to_string(), "site-2".to_string()]).await;

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].status, SiteDeleteStatus::MaybeAlreadyDeleted);
        assert!(got[0].to_string().contains("may already be deleted"));
        // unscripted second call answers with an empty body
        assert_eq!(got[1].status, SiteDeleteStatus::Deleted);
    }
}
