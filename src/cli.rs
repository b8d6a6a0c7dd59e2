use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use crate::api_client::ApiClient;
use crate::commands::{
    app_command::{create, delete as app_delete, list as app_list},
    domain_command::{delete as domain_delete, list as domain_list},
    site_command::{delete as site_delete, deploy},
    whoami,
};
use crate::config::ClientConfig;
use crate::models::{IconSize, StatsPeriod};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the apps you can edit
    #[command(name = "apps:list")]
    AppsList {
        /// Statistics window
        #[arg(value_enum, default_value_t = StatsPeriod::All)]
        stats_period: StatsPeriod,

        /// Icon size in pixels
        #[arg(value_enum, default_value_t = IconSize::Px64)]
        icon_size: IconSize,
    },

    /// Create a new app with its own directory and subdomain
    #[command(name = "app:create")]
    AppCreate {
        /// Name of the app
        name: String,

        /// Description of the app
        description: Option<String>,

        /// Initial index URL
        url: Option<String>,
    },

    /// Delete an app by name (not by title)
    #[command(name = "app:delete")]
    AppDelete {
        /// Name of the app
        name: String,
    },

    /// List your subdomains
    #[command(name = "domains:list")]
    DomainsList,

    /// Delete subdomains by uid
    #[command(name = "domain:delete")]
    DomainDelete {
        /// Subdomain uids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete hosted sites by uuid
    #[command(name = "site:delete")]
    SiteDelete {
        /// Site uuids
        #[arg(required = true)]
        uuids: Vec<String>,
    },

    /// Deploy a remote directory as a static site
    Deploy {
        /// Name of the app
        name: String,

        /// Directory to deploy, relative to the remote working directory
        dir: Option<String>,

        /// Subdomain to deploy to (defaults to the app name)
        #[arg(long)]
        subdomain: Option<String>,
    },

    /// Show the current user
    Whoami,
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    let cwd = config.remote_cwd.clone();
    let api = ApiClient::new(config)?;

    let outcome: Result<(), String> = match cli.command {
        Commands::AppsList {
            stats_period,
            icon_size,
        } => app_list::execute(&api, stats_period, icon_size)
            .await
            .map(|apps| app_list::print(&apps))
            .map_err(|e| format!("Failed to list apps: {}", e)),
        Commands::AppCreate {
            name,
            description,
            url,
        } => create::execute(
            &api,
            &create::CreateAppRequest {
                name,
                description,
                url,
            },
        )
        .await
        .map(|created| create::print(&created))
        .map_err(|e| e.to_string()),
        Commands::AppDelete { name } => app_delete::execute(&api, &name)
            .await
            .map(|app| println!("App '{}' deleted successfully", app.name))
            .map_err(|e| e.to_string()),
        Commands::DomainsList => domain_list::execute(&api, json!({}))
            .await
            .map(|subdomains| domain_list::print(&subdomains))
            .map_err(|e| e.to_string()),
        Commands::DomainDelete { ids } => domain_delete::execute(&api, &ids)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Commands::SiteDelete { uuids } => {
            site_delete::execute(&api, &uuids).await;
            Ok(())
        }
        Commands::Deploy {
            name,
            dir,
            subdomain,
        } => deploy::execute(
            &api,
            &deploy::DeployRequest {
                app_name: name,
                dir,
                subdomain,
                cwd,
            },
        )
        .await
        .map(|outcome| println!("{}", outcome))
        .map_err(|e| e.to_string()),
        Commands::Whoami => whoami::execute(&api)
            .await
            .map(|account| whoami::print(&account))
            .map_err(|e| e.to_string()),
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(message) => {
            error!("{}", message);
            eprintln!("Error: {}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_deploy_accepts_subdomain_flag_with_equals() {
        let cli = Cli::try_parse_from(["puter", "deploy", "myapp", "site", "--subdomain=blog"])
            .unwrap();

        match cli.command {
            Commands::Deploy {
                name,
                dir,
                subdomain,
            } => {
                assert_eq!(name, "myapp");
                assert_eq!(dir.as_deref(), Some("site"));
                assert_eq!(subdomain.as_deref(), Some("blog"));
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_apps_list_parses_period_and_icon_size() {
        let cli = Cli::try_parse_from(["puter", "apps:list", "7d", "256"]).unwrap();

        match cli.command {
            Commands::AppsList {
                stats_period,
                icon_size,
            } => {
                assert_eq!(stats_period, StatsPeriod::SevenDays);
                assert_eq!(icon_size, IconSize::Px256);
            }
            _ => panic!("expected apps:list"),
        }
    }

    #[test]
    fn test_apps_list_rejects_unknown_icon_size() {
        assert!(Cli::try_parse_from(["puter", "apps:list", "all", "100"]).is_err());
    }
}
