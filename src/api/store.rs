//! Distribution store API client for update availability and delivery.
//!
//! Implements the [`UpdatePlatform`] contract over the store's REST
//! endpoints. The store owns the actual download and install mechanics; this
//! client only issues the four narrow requests the orchestrator needs and
//! maps the responses onto the platform types.
//!
//! ## Endpoints
//!
//! - `GET  /api/v1/updates/check` — availability and allowed modes
//! - `POST /api/v1/updates/start` — begin an update in a given mode
//! - `GET  /api/v1/updates/status` — current session status (polled)
//! - `POST /api/v1/updates/complete` — install a downloaded flexible update
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appup::api::store::{StoreClient, StoreConfig};
//!
//! let config = StoreConfig {
//!     api_url: "https://store.example.com".to_string(),
//!     auth_token: "sct-xxxxxxxxxxxxxxxx".to_string(),
//! };
//! let client = StoreClient::new(&config);
//! ```

use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::platform::{AvailabilityInfo, PlatformError, StatusReport, UpdateHandle, UpdateMode, UpdatePlatform};
use crate::msg_print;
use anyhow::Result;
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// HTTP client for the distribution store's update API.
///
/// Stateless apart from the connection pool; safe to share behind an `Arc`
/// between the orchestrator and a running background session.
#[derive(Debug)]
pub struct StoreClient {
    /// HTTP client for making API requests with connection pooling
    client: Client,
    /// Configuration containing API endpoint and authentication details
    config: StoreConfig,
}

/// Availability response returned by the store's check endpoint.
#[derive(Debug, Deserialize)]
struct CheckResponse {
    /// Whether a newer build than the caller's exists
    update_available: bool,
    /// Modes the store permits for this update
    allowed_modes: Vec<UpdateMode>,
    /// Opaque token identifying the release artifact
    update_token: String,
}

/// Request body for starting an update.
#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    update_token: &'a str,
    mode: UpdateMode,
}

/// Generic acknowledgement returned by the start and complete endpoints.
#[derive(Debug, Deserialize)]
struct AckResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl StoreClient {
    /// Creates a new store API client instance.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/updates/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Unwraps a store acknowledgement, mapping a refusal to an error.
    fn check_ack(ack: AckResponse) -> Result<(), PlatformError> {
        if ack.ok {
            Ok(())
        } else {
            Err(PlatformError::Rejected(ack.error.unwrap_or_else(|| "unspecified".to_string())))
        }
    }
}

#[async_trait]
impl UpdatePlatform for StoreClient {
    async fn get_availability(&self) -> Result<AvailabilityInfo, PlatformError> {
        let response = self
            .client
            .get(self.endpoint("check"))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| PlatformError::Rejected(e.to_string()))?;

        let check = response.json::<CheckResponse>().await.map_err(|e| PlatformError::Protocol(e.to_string()))?;

        Ok(AvailabilityInfo {
            available: check.update_available,
            allowed_modes: check.allowed_modes,
            handle: UpdateHandle(check.update_token),
        })
    }

    async fn start_update(&self, info: &AvailabilityInfo, mode: UpdateMode) -> Result<(), PlatformError> {
        let body = StartRequest {
            update_token: &info.handle.0,
            mode,
        };
        let ack = self
            .client
            .post(self.endpoint("start"))
            .bearer_auth(&self.config.auth_token)
            .json(&body)
            .send()
            .await?
            .json::<AckResponse>()
            .await
            .map_err(|e| PlatformError::Protocol(e.to_string()))?;

        Self::check_ack(ack)
    }

    async fn get_status(&self) -> Result<StatusReport, PlatformError> {
        let report = self
            .client
            .get(self.endpoint("status"))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await?
            .json::<StatusReport>()
            .await
            .map_err(|e| PlatformError::Protocol(e.to_string()))?;

        Ok(report)
    }

    async fn complete_update(&self) -> Result<(), PlatformError> {
        let ack = self
            .client
            .post(self.endpoint("complete"))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await?
            .json::<AckResponse>()
            .await
            .map_err(|e| PlatformError::Protocol(e.to_string()))?;

        Self::check_ack(ack)
    }
}

/// Configuration for the distribution store API binding.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Base URL of the store API.
    ///
    /// Do not include the `/api/v1` path - it will be added automatically.
    pub api_url: String,

    /// Access token presented as a bearer credential on every request.
    pub auth_token: String,
}

impl StoreConfig {
    /// Returns the configuration module metadata for the store binding.
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "store".to_string(),
            name: "Store".to_string(),
        }
    }

    /// Runs an interactive configuration setup for the store binding.
    ///
    /// Prompts for the API URL and access token, pre-filling existing values
    /// as defaults when configuration already exists.
    pub fn init(config: &Option<StoreConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or(Self {
            api_url: "".to_string(),
            auth_token: "".to_string(),
        });

        msg_print!(Message::ConfigModuleStore);

        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStoreApiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            auth_token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStoreAuthToken.to_string())
                .default(config.auth_token)
                .interact_text()?,
        })
    }
}
