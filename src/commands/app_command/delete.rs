use serde_json::json;
use tracing::{info, instrument};

use crate::api_client::{call_driver, call_driver_unit, PlatformApi};
use crate::format::{format_date, subdomain_from_url};
use crate::models::{App, APPS_INTERFACE};

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("App not found: {0}")]
    AppNotFound(String),
    #[error(
        "Failed to delete app '{name}': {reason}. Make sure you used the app name, not its title"
    )]
    DeleteFailed { name: String, reason: String },
}

type DeleteResult<T> = Result<T, DeleteError>;

/// Delete an app by its canonical name.
///
/// The app is read first and printed, then deleted.
#[instrument(skip(api))]
pub async fn execute(api: &dyn PlatformApi, app_name: &str) -> DeleteResult<App> {
    let app: App = call_driver(
        api,
        APPS_INTERFACE,
        "read",
        json!({ "id": { "name": app_name } }),
    )
    .await
    .map_err(|e| {
        info!("Lookup of app '{}' failed: {}", app_name, e);
        DeleteError::AppNotFound(app_name.to_string())
    })?;

    print_details(&app);

    call_driver_unit(
        api,
        APPS_INTERFACE,
        "delete",
        json!({ "id": { "name": app.name } }),
    )
    .await
    .map_err(|e| DeleteError::DeleteFailed {
        name: app_name.to_string(),
        reason: e.to_string(),
    })?;

    info!("Deleted app '{}'", app.name);

    Ok(app)
}

fn print_details(app: &App) {
    println!("App details:");
    println!("  Name: {}", app.name);
    println!("  Title: {}", app.display_title());
    println!("  Created: {}", format_date(app.created_at.as_deref()));
    println!(
        "  Subdomain: {}",
        subdomain_from_url(app.index_url.as_deref())
    );
    if let Some(url) = &app.index_url {
        println!("  URL: {}", url);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::test_utils::FakeApi;

    #[tokio::test]
    async fn test_deleting_non_existant_app() {
        let api = FakeApi::new("alice");
        api.on_driver_err(APPS_INTERFACE, "read", "entity_not_found");

        let got = execute(&api, "nonexistent-app").await.unwrap_err();

        assert!(got.to_string().contains("not found"));
        assert!(api.driver_calls(APPS_INTERFACE, "delete").is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_mentions_name_vs_title() {
        let api = FakeApi::new("alice");
        api.on_driver_ok(APPS_INTERFACE, "read", json!({ "name": "notes", "title": "Notes" }))
            .on_driver_err(APPS_INTERFACE, "delete", "forbidden");

        let got = execute(&api, "notes").await.unwrap_err();

        assert!(matches!(got, DeleteError::DeleteFailed { .. }));
        assert!(got.to_string().contains("not its title"));
    }

    #[tokio::test]
    async fn test_delete_happy_path() {
        let api = FakeApi::new("alice");
        api.on_driver_ok(APPS_INTERFACE, "read", json!({ "name": "notes" }))
            .on_driver_ok(APPS_INTERFACE, "delete", json!({}));

        let deleted = execute(&api, "notes").await.unwrap();

        assert_eq!(deleted.name, "notes");
        let deletes = api.driver_calls(APPS_INTERFACE, "delete");
        assert_eq!(deletes, vec![json!({ "id": { "name": "notes" } })]);
    }
}
