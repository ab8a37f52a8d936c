//! Application configuration initialization command.
//!
//! Interactive setup wizard for first-time use: distribution store binding
//! (API URL and token) and updater tuning (poll interval, thresholds,
//! optional poll bound).

use crate::{
    libs::{config::Config, data_storage::DataStorage, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

/// Command-line arguments for the initialization command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove existing configuration instead of creating new one
    #[arg(short, long)]
    delete: bool,
}

/// Executes the initialization command.
///
/// Runs the interactive configuration wizard, or removes the existing
/// configuration file when `--delete` is used.
pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        let config_path = DataStorage::new().get_path(crate::libs::config::CONFIG_FILE_NAME)?;
        if config_path.exists() {
            std::fs::remove_file(config_path)?;
        }
        return Ok(());
    }

    // Run interactive configuration wizard
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
