use chrono::{DateTime, NaiveDateTime};
use reqwest::Url;

/// Shown in tables when a value is missing
pub const NONE_SENTINEL: &str = "<none>";

/// Format a server timestamp as `YYYY-MM-DD`, falling back to the raw value
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "N/A".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

/// The first host label of an app's index URL, e.g. `notes` for
/// `https://notes.puter.site/index.html`
pub fn subdomain_from_url(index_url: Option<&str>) -> String {
    index_url
        .and_then(|raw| Url::parse(raw).ok())
        .and_then(|url| {
            url.host_str()
                .and_then(|host| host.split('.').next())
                .map(str::to_string)
        })
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| NONE_SENTINEL.to_string())
}
