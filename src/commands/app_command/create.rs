use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api_client::{call_driver, call_driver_unit, PlatformApi};
use crate::errors::{util::validate_app_name, PuterError};
use crate::models::{
    site_url, App, MkdirRequest, Subdomain, APPS_INTERFACE, SUBDOMAINS_INTERFACE,
};

pub const DEFAULT_INDEX_URL: &str = "https://dev-center.puter.com/coming-soon.html";

/// The named steps of app creation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStep {
    CreateApp,
    CreateDirectory,
    CreateSubdomain,
    UpdateUrl,
}

impl std::fmt::Display for CreateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateStep::CreateApp => write!(f, "create app"),
            CreateStep::CreateDirectory => write!(f, "create directory"),
            CreateStep::CreateSubdomain => write!(f, "create subdomain"),
            CreateStep::UpdateUrl => write!(f, "update app url"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppCreateError {
    #[error("Invalid app: {0}")]
    Invalid(#[source] PuterError),
    #[error("Failed to {step}: {source}{}", leftover_note(.created))]
    StepFailed {
        step: CreateStep,
        created: Vec<String>,
        #[source]
        source: PuterError,
    },
}

fn leftover_note(created: &[String]) -> String {
    if created.is_empty() {
        String::new()
    } else {
        format!(" (already created, not rolled back: {})", created.join(", "))
    }
}

impl AppCreateError {
    pub fn step(&self) -> Option<CreateStep> {
        match self {
            AppCreateError::Invalid(_) => None,
            AppCreateError::StepFailed { step, .. } => Some(*step),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAppRequest {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl CreateAppRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatedApp {
    pub name: String,
    pub uid: String,
    pub directory: String,
    pub subdomain: String,
    pub url: String,
}

/// Tracks progress so a failure can report what was left behind
struct Saga {
    created: Vec<String>,
}

impl Saga {
    fn fail(&self, step: CreateStep, source: PuterError) -> AppCreateError {
        warn!("App creation stopped at step '{}': {}", step, source);
        AppCreateError::StepFailed {
            step,
            created: self.created.clone(),
            source,
        }
    }
}

/// Create an app backed by its own directory and subdomain.
///
/// Steps run in order and stop at the first failure. Earlier steps are not
/// undone.
#[instrument(skip(api))]
pub async fn execute(
    api: &dyn PlatformApi,
    request: &CreateAppRequest,
) -> Result<CreatedApp, AppCreateError> {
    validate_app_name(&request.name).map_err(AppCreateError::Invalid)?;

    let mut saga = Saga {
        created: Vec::new(),
    };

    // Step 1: app record, the server picks the canonical name
    let app: App = call_driver(
        api,
        APPS_INTERFACE,
        "create",
        json!({
            "object": {
                "name": request.name,
                "title": request.name,
                "description": request.description.clone().unwrap_or_default(),
                "index_url": request.url.as_deref().unwrap_or(DEFAULT_INDEX_URL),
            },
            "options": { "dedupe_name": true },
        }),
    )
    .await
    .map_err(|e| saga.fail(CreateStep::CreateApp, e))?;

    let app_uid = app
        .uid
        .clone()
        .ok_or_else(|| saga.fail(CreateStep::CreateApp, PuterError::MissingResult))?;
    saga.created.push(format!("app '{}'", app.name));
    info!("Created app '{}' ({})", app.name, app_uid);

    let username = match app.owner_name() {
        Some(username) => username.to_string(),
        None => {
            api.whoami()
                .await
                .map_err(|e| saga.fail(CreateStep::CreateDirectory, e))?
                .username
        }
    };

    // Step 2: backing directory
    let dir_id = Uuid::new_v4().to_string();
    let mkdir = MkdirRequest {
        parent: format!("/{}/AppData/{}", username, app_uid),
        path: format!("app-{}", dir_id),
        overwrite: false,
        dedupe_name: true,
        create_missing_parents: true,
    };
    let directory = api
        .mkdir(&mkdir)
        .await
        .map_err(|e| saga.fail(CreateStep::CreateDirectory, e))?;
    let directory_path = directory.path.unwrap_or_else(|| mkdir.full_path());
    saga.created.push(format!("directory '{}'", directory_path));
    info!("Created directory {}", directory_path);

    // Step 3: subdomain bound to the directory
    let subdomain_name = format!("{}-{}", request.name, first_segment(&dir_id));
    let subdomain: Subdomain = call_driver(
        api,
        SUBDOMAINS_INTERFACE,
        "create",
        json!({
            "object": { "subdomain": subdomain_name, "root_dir": directory_path },
        }),
    )
    .await
    .map_err(|e| saga.fail(CreateStep::CreateSubdomain, e))?;
    saga.created.push(format!("subdomain '{}'", subdomain.subdomain));
    info!("Created subdomain {}", subdomain.subdomain);

    // Step 4: point the app at its public site
    let url = site_url(&app.name);
    call_driver_unit(
        api,
        APPS_INTERFACE,
        "update",
        json!({
            "id": { "name": app.name },
            "object": { "index_url": url, "title": request.name },
        }),
    )
    .await
    .map_err(|e| saga.fail(CreateStep::UpdateUrl, e))?;

    info!("App '{}' now serves {}", app.name, url);

    Ok(CreatedApp {
        name: app.name,
        uid: app_uid,
        directory: directory_path,
        subdomain: subdomain.subdomain,
        url,
    })
}

fn first_segment(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

pub fn print(created: &CreatedApp) {
    println!("App '{}' created successfully", created.name);
    println!("  UID: {}", created.uid);
    println!("  Directory: {}", created.directory);
    println!("  Subdomain: {}", created.subdomain);
    println!("  URL: {}", created.url);
}
