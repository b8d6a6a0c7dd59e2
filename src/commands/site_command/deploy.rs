use serde_json::json;
use std::collections::HashSet;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api_client::{call_driver, PlatformApi};
use crate::commands::domain_command;
use crate::errors::PuterError;
use crate::models::{site_url, Subdomain, SUBDOMAINS_INTERFACE};
use crate::paths::resolve_remote_path;

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "dusty", "eager", "fuzzy", "gentle", "hidden", "icy", "jolly",
    "keen", "lucky", "misty", "noble", "quiet", "rapid", "shiny", "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "canyon", "delta", "ember", "falcon", "garden", "harbor", "island", "jungle",
    "lagoon", "meadow", "nebula", "orchard", "pebble", "river", "summit", "tundra", "valley",
    "willow", "zephyr",
];

const MAX_NAME_ATTEMPTS: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("App name must not be empty")]
    MissingAppName,
    #[error("Failed to look up subdomains: {0}")]
    Lookup(#[source] PuterError),
    #[error("Unable to release subdomain '{subdomain}': {source}")]
    ReleaseFailed {
        subdomain: String,
        #[source]
        source: PuterError,
    },
    #[error("Could not find a free subdomain name")]
    NoFreeSubdomain,
    #[error("Failed to host '{dir}' on '{subdomain}': {source}")]
    HostFailed {
        subdomain: String,
        dir: String,
        #[source]
        source: PuterError,
    },
    #[error("Failed to identify the current user: {0}")]
    WhoAmI(#[source] PuterError),
}

#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub app_name: String,
    /// Directory to serve, relative to the remote working directory
    pub dir: Option<String>,
    /// Explicit subdomain, wins over the app name
    pub subdomain: Option<String>,
    /// Remote working directory. Defaults to the user's home.
    pub cwd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed {
        subdomain: String,
        dir: String,
        url: String,
        /// The requested subdomain when it belonged to someone else
        replaced: Option<String>,
    },
    AlreadyDeployed {
        subdomain: String,
        url: String,
    },
    /// The user's own subdomain pointed elsewhere and was unbound
    Released {
        subdomain: String,
    },
}

impl std::fmt::Display for DeployOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployOutcome::Deployed {
                dir, url, replaced, ..
            } => {
                if let Some(requested) = replaced {
                    writeln!(
                        f,
                        "Subdomain '{}' is owned by another user, a random one was used instead",
                        requested
                    )?;
                }
                write!(f, "Deployed '{}', your site is live at {}", dir, url)
            }
            DeployOutcome::AlreadyDeployed { url, .. } => {
                write!(f, "This directory is already deployed at {}", url)
            }
            DeployOutcome::Released { subdomain } => write!(
                f,
                "Subdomain '{}' was pointing at another directory and has been released. Run the deploy again to use it",
                subdomain
            ),
        }
    }
}

/// Deploy a remote directory as a static site
#[instrument(skip(api))]
pub async fn execute(
    api: &dyn PlatformApi,
    request: &DeployRequest,
) -> Result<DeployOutcome, DeployError> {
    if request.app_name.trim().is_empty() {
        return Err(DeployError::MissingAppName);
    }

    let username = api.whoami().await.map_err(DeployError::WhoAmI)?.username;
    let home = format!("/{}", username);
    let cwd = request.cwd.clone().unwrap_or_else(|| home.clone());

    let dir = match request.dir.as_deref() {
        Some(dir) if !dir.starts_with("--") => resolve_remote_path(&cwd, &home, dir),
        _ => resolve_remote_path(&cwd, &home, "."),
    };

    let mut candidate = request
        .subdomain
        .clone()
        .unwrap_or_else(|| request.app_name.clone());
    let mut replaced = None;

    let existing = domain_command::list::execute(api, json!({}))
        .await
        .map_err(DeployError::Lookup)?;

    if let Some(bound) = existing.iter().find(|s| s.subdomain == candidate) {
        if bound.is_owned_by(&username) {
            if bound.root_path() == Some(dir.as_str()) {
                info!("Subdomain '{}' already serves {}", candidate, dir);
                return Ok(DeployOutcome::AlreadyDeployed {
                    url: site_url(&candidate),
                    subdomain: candidate,
                });
            }

            domain_command::delete::delete_one(api, &bound.uid)
                .await
                .map_err(|e| DeployError::ReleaseFailed {
                    subdomain: candidate.clone(),
                    source: match e {
                        domain_command::delete::SubdomainDeleteError::NotFound(id) => {
                            PuterError::NotFound(id)
                        }
                        domain_command::delete::SubdomainDeleteError::Failed { source, .. } => {
                            source
                        }
                    },
                })?;

            info!("Released subdomain '{}'", candidate);
            return Ok(DeployOutcome::Released {
                subdomain: candidate,
            });
        }

        warn!("Subdomain '{}' is owned by another user", candidate);
        let generated = generate_subdomain(&existing).ok_or(DeployError::NoFreeSubdomain)?;
        replaced = Some(std::mem::replace(&mut candidate, generated));
    }

    let hosted: Subdomain = call_driver(
        api,
        SUBDOMAINS_INTERFACE,
        "create",
        json!({ "object": { "subdomain": candidate, "root_dir": dir } }),
    )
    .await
    .map_err(|e| DeployError::HostFailed {
        subdomain: candidate.clone(),
        dir: dir.clone(),
        source: e,
    })?;

    let url = site_url(&hosted.subdomain);
    info!("Deployed {} to {}", dir, url);

    Ok(DeployOutcome::Deployed {
        subdomain: hosted.subdomain,
        dir,
        url,
        replaced,
    })
}

/// Generate a random `<adjective>-<noun>-<hex>` name absent from `existing`
pub fn generate_subdomain(existing: &[Subdomain]) -> Option<String> {
    let taken: HashSet<&str> = existing.iter().map(|s| s.subdomain.as_str()).collect();

    (0..MAX_NAME_ATTEMPTS)
        .map(|_| random_name())
        .find(|name| !taken.contains(name.as_str()))
}

fn random_name() -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    let adjective = ADJECTIVES[bytes[0] as usize % ADJECTIVES.len()];
    let noun = NOUNS[bytes[1] as usize % NOUNS.len()];
    format!("{}-{}-{:02x}{:02x}", adjective, noun, bytes[2], bytes[3])
}
