//! Configuration management for the appup application.
//!
//! Settings live in a JSON file in the platform-specific application data
//! directory. Each section is optional: the distribution-store binding and
//! the updater tuning can be configured independently, and missing sections
//! fall back to defaults. An interactive setup wizard (`appup init`) walks
//! through whichever modules the user selects.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appup::libs::config::Config;
//!
//! // Load existing configuration or create default
//! let config = Config::read()?;
//! let updater = config.updater.unwrap_or_default();
//! # anyhow::Ok(())
//! ```

use crate::api::store::StoreConfig;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
///
/// Used during interactive setup to display available modules and route the
/// user's selection to the right section wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Update orchestration tuning.
///
/// The thresholds implement the fixed priority policy: a priority at or
/// above `immediate_threshold` forces the immediate path, one at or above
/// `flexible_threshold` permits the background path, anything lower means no
/// update is offered even when one is available.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdaterConfig {
    /// Wait between status polls of a flexible session, in seconds.
    pub poll_interval: u64,

    /// Priority at or above which the immediate path is forced.
    pub immediate_threshold: u8,

    /// Priority at or above which a flexible session may be offered.
    pub flexible_threshold: u8,

    /// Upper bound on flexible polling, in seconds. Unset means the loop
    /// polls until a terminal status is observed, matching the default
    /// behavior of the platform flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_poll_duration: Option<u64>,
}

impl Default for UpdaterConfig {
    /// Defaults mirror the platform flow: 1 second between polls, priority 4
    /// forces an immediate update, priority 1 permits a flexible one, and
    /// polling is unbounded.
    fn default() -> Self {
        UpdaterConfig {
            poll_interval: 1,
            immediate_threshold: 4,
            flexible_threshold: 1,
            max_poll_duration: None,
        }
    }
}

/// Main configuration container for the application.
///
/// All sections are optional so users configure only what they need, and
/// unset sections are omitted from the JSON output entirely.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Distribution-store API binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,

    /// Update orchestration tuning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updater: Option<UpdaterConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// Returns the default (empty) configuration when no file exists yet;
    /// an existing but unreadable or unparsable file is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive configuration setup wizard.
    ///
    /// Presents the available modules, collects parameters for the selected
    /// ones with existing values as defaults, and returns the updated
    /// configuration for saving.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let node_descriptions = vec![
            StoreConfig::module(),
            ConfigModule {
                key: "updater".to_string(),
                name: "Updater".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "store" => config.store = Some(StoreConfig::init(&config.store)?),
                "updater" => {
                    let default = config.updater.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleUpdater);
                    config.updater = Some(UpdaterConfig {
                        poll_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(default.poll_interval)
                            .interact_text()?,

                        immediate_threshold: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptImmediateThreshold.to_string())
                            .default(default.immediate_threshold)
                            .interact_text()?,

                        flexible_threshold: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptFlexibleThreshold.to_string())
                            .default(default.flexible_threshold)
                            .interact_text()?,

                        // Zero keeps polling unbounded, any other value caps it.
                        max_poll_duration: match Input::<u64>::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxPollDuration.to_string())
                            .default(default.max_poll_duration.unwrap_or(0))
                            .interact_text()?
                        {
                            0 => None,
                            secs => Some(secs),
                        },
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
