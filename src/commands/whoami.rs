use tracing::instrument;

use crate::api_client::PlatformApi;
use crate::errors::PuterResult;
use crate::models::WhoAmI;

/// Show the authenticated account
#[instrument(skip(api))]
pub async fn execute(api: &dyn PlatformApi) -> PuterResult<WhoAmI> {
    api.whoami().await
}

pub fn print(account: &WhoAmI) {
    println!("Logged in as {}", account.username);
    if let Some(email) = &account.email {
        println!("  Email: {}", email);
    }
}
