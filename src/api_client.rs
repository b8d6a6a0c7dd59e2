use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::errors::{PuterError, PuterResult};
use crate::models::{DirectoryEntry, DriverResponse, MkdirRequest, WhoAmI};

/// Remote calls the commands depend on
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Invoke `method` on a driver `interface` through `/drivers/call`
    async fn driver_call(
        &self,
        interface: &str,
        method: &str,
        args: Value,
    ) -> PuterResult<DriverResponse>;

    /// Create a remote directory
    async fn mkdir(&self, request: &MkdirRequest) -> PuterResult<DirectoryEntry>;

    /// Delete a hosted site. Returns the raw response body.
    async fn delete_site(&self, site_uuid: &str) -> PuterResult<Value>;

    /// The authenticated account
    async fn whoami(&self) -> PuterResult<WhoAmI>;
}

/// Call a driver method and decode its result
pub async fn call_driver<T: DeserializeOwned>(
    api: &dyn PlatformApi,
    interface: &str,
    method: &str,
    args: Value,
) -> PuterResult<T> {
    api.driver_call(interface, method, args)
        .await?
        .into_result()
}

/// Call a driver method whose result is not needed
pub async fn call_driver_unit(
    api: &dyn PlatformApi,
    interface: &str,
    method: &str,
    args: Value,
) -> PuterResult<()> {
    api.driver_call(interface, method, args).await?.into_unit()
}

pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> PuterResult<Self> {
        Self::with_builder(config, Client::builder())
    }

    /// Build on a caller-supplied `ClientBuilder`, e.g. one with proxies
    /// or timeouts configured
    pub fn with_builder(config: ClientConfig, builder: ClientBuilder) -> PuterResult<Self> {
        let client = builder
            .default_headers(Self::default_headers(&config)?)
            .build()?;

        Ok(Self { config, client })
    }

    fn default_headers(config: &ClientConfig) -> PuterResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&config.origin)
                .map_err(|e| PuterError::Validation(format!("invalid origin: {}", e)))?,
        );
        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| PuterError::Validation(format!("invalid auth token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> PuterResult<Response> {
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await?;
            Err(PuterError::Http { status, body })
        }
    }
}

#[async_trait]
impl PlatformApi for ApiClient {
    #[instrument(skip(self, args))]
    async fn driver_call(
        &self,
        interface: &str,
        method: &str,
        args: Value,
    ) -> PuterResult<DriverResponse> {
        let body = json!({ "interface": interface, "method": method, "args": args });
        // Driver failures come back as JSON envelopes, often with a 4xx status
        let response = self
            .client
            .post(self.url("/drivers/call"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, "driver call completed");

        match serde_json::from_str::<DriverResponse>(&text) {
            // An error body that is not an envelope keeps its status and text
            Ok(envelope)
                if !status.is_success() && envelope.error.is_none() && envelope.result.is_none() =>
            {
                Err(PuterError::Http {
                    status: status.as_u16(),
                    body: text,
                })
            }
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(PuterError::Http {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn mkdir(&self, request: &MkdirRequest) -> PuterResult<DirectoryEntry> {
        let response = self
            .send(self.client.post(self.url("/mkdir")).json(request))
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn delete_site(&self, site_uuid: &str) -> PuterResult<Value> {
        let response = self
            .send(
                self.client
                    .post(self.url("/delete-site"))
                    .json(&json!({ "site_uuid": site_uuid })),
            )
            .await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self))]
    async fn whoami(&self) -> PuterResult<WhoAmI> {
        let response = self.send(self.client.get(self.url("/whoami"))).await?;
        Ok(response.json().await?)
    }
}
