use prettytable::{format, row, Table};
use serde_json::Value;
use tracing::{error, instrument};

use crate::api_client::{call_driver, PlatformApi};
use crate::errors::PuterResult;
use crate::format::{format_date, NONE_SENTINEL};
use crate::models::{Subdomain, SUBDOMAINS_INTERFACE};

/// Fetch subdomains matching `args`, which are passed through unchanged
#[instrument(skip(api))]
pub async fn execute(api: &dyn PlatformApi, args: Value) -> PuterResult<Vec<Subdomain>> {
    call_driver(api, SUBDOMAINS_INTERFACE, "select", args)
        .await
        .map_err(|e| {
            error!("Failed to list subdomains: {}", e);
            e
        })
}

pub fn render(subdomains: &[Subdomain]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["UID", "SUBDOMAIN", "ROOT DIR", "PROTECTED", "CREATED"]);

    for subdomain in subdomains {
        let protected = if subdomain.protected { "yes" } else { "no" };
        table.add_row(row![
            subdomain.uid,
            subdomain.subdomain,
            subdomain.root_path().unwrap_or(NONE_SENTINEL),
            protected,
            format_date(subdomain.created_at.as_deref())
        ]);
    }

    table
}

pub fn print(subdomains: &[Subdomain]) {
    if subdomains.is_empty() {
        println!("No subdomains found");
        return;
    }

    render(subdomains).printstd();
}
