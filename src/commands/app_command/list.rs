use prettytable::{format, row, Table};
use serde_json::json;
use tracing::{info, instrument};

use crate::api_client::PlatformApi;
use crate::errors::PuterResult;
use crate::format::{format_date, subdomain_from_url};
use crate::models::{App, IconSize, StatsPeriod, APPS_INTERFACE};

/// Fetch the apps the current user can edit
#[instrument(skip(api))]
pub async fn execute(
    api: &dyn PlatformApi,
    stats_period: StatsPeriod,
    icon_size: IconSize,
) -> PuterResult<Vec<App>> {
    let apps: Vec<App> = api
        .driver_call(
            APPS_INTERFACE,
            "select",
            json!({
                "predicate": ["user-can-edit"],
                "stats_period": stats_period.as_str(),
                "icon_size": icon_size.pixels(),
            }),
        )
        .await?
        .into_result()?;

    info!("Fetched {} apps", apps.len());

    Ok(apps)
}

/// Render apps as a table
pub fn render(apps: &[App]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["TITLE", "NAME", "CREATED", "SUBDOMAIN", "OPENS", "USERS"]);

    for app in apps {
        let stats = app.stats.clone().unwrap_or_default();
        table.add_row(row![
            app.display_title(),
            app.name,
            format_date(app.created_at.as_deref()),
            subdomain_from_url(app.index_url.as_deref()),
            stats.open_count.to_string(),
            stats.user_count.to_string()
        ]);
    }

    table
}

pub fn print(apps: &[App]) {
    if apps.is_empty() {
        println!("No apps found");
        return;
    }

    render(apps).printstd();
    println!("\nYou have {} app(s)", apps.len());
}
