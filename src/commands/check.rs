//! Update check command: the caller side of the orchestration core.
//!
//! Wires the configured store client and the orchestrator together, then
//! invokes a single update check with the priority supplied on the command
//! line. In a deployed application the priority would come from a remote
//! configuration service; the flag stands in for that source here.
//!
//! When the check hands off to a flexible background session, this command
//! waits the session out before returning so the process does not exit with
//! a download still in flight. An embedding application would instead keep
//! the orchestrator alive and let the session run alongside normal use.

use crate::{
    api::store::StoreClient,
    libs::{config::Config, exit::ProcessExit, messages::Message, orchestrator::UpdateOrchestrator},
    msg_bail_anyhow, msg_info,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

/// Command-line arguments for the update check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Update priority level (0-5); 4+ forces an immediate update,
    /// 1+ permits a flexible background update
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    priority: u8,
}

/// Executes the update check.
pub async fn cmd(check_args: CheckArgs) -> Result<()> {
    let config = Config::read()?;

    let store = match &config.store {
        Some(store) => StoreClient::new(store),
        None => msg_bail_anyhow!(Message::StoreNotConfigured),
    };
    let updater = config.updater.unwrap_or_default();

    let orchestrator = UpdateOrchestrator::new(Arc::new(store), updater, Arc::new(ProcessExit));
    orchestrator.check_for_update(check_args.priority).await;

    // A flexible session outlives the check call; hold the process open
    // until it reaches a terminal state.
    if let Some(session) = orchestrator.take_session() {
        let status = session.join().await;
        msg_info!(Message::UpdateSessionFinished(status.to_string()));
    }

    Ok(())
}
