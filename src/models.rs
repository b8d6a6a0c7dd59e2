use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PuterError, PuterResult};

pub const APPS_INTERFACE: &str = "puter-apps";
pub const SUBDOMAINS_INTERFACE: &str = "puter-subdomains";

/// Hosted sites live under this domain
pub const SITE_DOMAIN: &str = "puter.site";

pub fn site_url(subdomain: &str) -> String {
    format!("https://{}.{}", subdomain, SITE_DOMAIN)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStats {
    #[serde(default)]
    pub open_count: u64,
    #[serde(default)]
    pub user_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub uid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub index_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub stats: Option<AppStats>,
}

impl App {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.username.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootDir {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdomain {
    #[serde(default)]
    pub uid: String,
    pub subdomain: String,
    #[serde(default)]
    pub root_dir: Option<RootDir>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Subdomain {
    pub fn root_path(&self) -> Option<&str> {
        self.root_dir.as_ref().map(|d| d.path.as_str())
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner
            .as_ref()
            .map(|o| o.username == username)
            .unwrap_or(false)
    }
}

/// Remote filesystem node returned by `/mkdir`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub uid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MkdirRequest {
    pub parent: String,
    pub path: String,
    pub overwrite: bool,
    pub dedupe_name: bool,
    pub create_missing_parents: bool,
}

impl MkdirRequest {
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.parent.trim_end_matches('/'), self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmI {
    pub username: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Envelope returned by `/drivers/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

impl DriverResponse {
    /// Validate the envelope and decode `result` into `T`
    pub fn into_result<T: DeserializeOwned>(self) -> PuterResult<T> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        match self.result {
            Some(Value::Null) | None if !self.success => Err(PuterError::Api {
                code: "unknown".to_string(),
                message: "request was not successful".to_string(),
            }),
            Some(Value::Null) | None => Err(PuterError::MissingResult),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Validate the envelope for calls whose result is not needed
    pub fn into_unit(self) -> PuterResult<()> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        if !self.success && self.result.is_none() {
            return Err(PuterError::Api {
                code: "unknown".to_string(),
                message: "request was not successful".to_string(),
            });
        }
        Ok(())
    }
}

impl From<ErrorInfo> for PuterError {
    fn from(error: ErrorInfo) -> Self {
        if error.code == "entity_not_found" {
            PuterError::NotFound(error.message)
        } else {
            PuterError::Api {
                code: error.code,
                message: error.message,
            }
        }
    }
}

/// Aggregation window for app statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatsPeriod {
    #[default]
    All,
    Today,
    Yesterday,
    #[value(name = "7d")]
    SevenDays,
    #[value(name = "30d")]
    ThirtyDays,
    #[value(name = "this_month")]
    ThisMonth,
    #[value(name = "last_month")]
    LastMonth,
    #[value(name = "this_year")]
    ThisYear,
    #[value(name = "last_year")]
    LastYear,
    #[value(name = "month_to_date")]
    MonthToDate,
    #[value(name = "year_to_date")]
    YearToDate,
    #[value(name = "last_12_months")]
    Last12Months,
}

impl StatsPeriod {
    pub const ALL: [StatsPeriod; 12] = [
        StatsPeriod::All,
        StatsPeriod::Today,
        StatsPeriod::Yesterday,
        StatsPeriod::SevenDays,
        StatsPeriod::ThirtyDays,
        StatsPeriod::ThisMonth,
        StatsPeriod::LastMonth,
        StatsPeriod::ThisYear,
        StatsPeriod::LastYear,
        StatsPeriod::MonthToDate,
        StatsPeriod::YearToDate,
        StatsPeriod::Last12Months,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::All => "all",
            StatsPeriod::Today => "today",
            StatsPeriod::Yesterday => "yesterday",
            StatsPeriod::SevenDays => "7d",
            StatsPeriod::ThirtyDays => "30d",
            StatsPeriod::ThisMonth => "this_month",
            StatsPeriod::LastMonth => "last_month",
            StatsPeriod::ThisYear => "this_year",
            StatsPeriod::LastYear => "last_year",
            StatsPeriod::MonthToDate => "month_to_date",
            StatsPeriod::YearToDate => "year_to_date",
            StatsPeriod::Last12Months => "last_12_months",
        }
    }
}

impl std::fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IconSize {
    #[value(name = "16")]
    Px16,
    #[value(name = "32")]
    Px32,
    #[default]
    #[value(name = "64")]
    Px64,
    #[value(name = "128")]
    Px128,
    #[value(name = "256")]
    Px256,
    #[value(name = "512")]
    Px512,
}

impl IconSize {
    pub fn pixels(&self) -> u32 {
        match self {
            IconSize::Px16 => 16,
            IconSize::Px32 => 32,
            IconSize::Px64 => 64,
            IconSize::Px128 => 128,
            IconSize::Px256 => 256,
            IconSize::Px512 => 512,
        }
    }
}

impl std::fmt::Display for IconSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pixels())
    }
}
