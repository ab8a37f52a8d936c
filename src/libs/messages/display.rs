//! Display implementation for appup application messages.
//!
//! Converts structured [`Message`](super::Message) values into the
//! human-readable text shown in the terminal or routed to the tracing
//! system. All user-facing text lives here, in one place, so wording stays
//! consistent and parameters stay type-checked at the call site.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === AVAILABILITY MESSAGES ===
            Message::PriorityLevelReceived(priority) => format!("Priority level {}", priority),
            Message::NoUpdateAvailable => "No update available.".to_string(),
            Message::NoSuitableUpdateType => "No suitable update type available.".to_string(),
            Message::AvailabilityQueryFailed(error) => format!("Failed to get update info: {}", error),
            Message::UpdateAlreadyInProgress => "An update session is already in progress, ignoring this check.".to_string(),

            // === IMMEDIATE UPDATE MESSAGES ===
            Message::ImmediateUpdateStarting => "Starting immediate update...".to_string(),
            Message::ImmediateUpdateSucceeded => "Immediate update completed, the platform will restart the application.".to_string(),
            Message::ImmediateUpdateFailed(error) => format!("Immediate update failed or canceled: {}", error),

            // === FLEXIBLE UPDATE MESSAGES ===
            Message::FlexibleUpdateStarting => "Starting flexible update...".to_string(),
            Message::FlexibleUpdateStarted => "Flexible update started successfully!".to_string(),
            Message::FlexibleStartFailed(error) => format!("Failed to start update: {}", error),
            Message::FlexibleUpdateDownloaded => "Flexible update downloaded. Completing update...".to_string(),
            Message::FlexibleUpdateInstalled => "Flexible update installed successfully.".to_string(),
            Message::FlexibleInstallFailed(error) => format!("Flexible update installation failed: {}", error),
            Message::FlexibleUpdateAborted(status) => format!("Flexible update failed or was canceled ({}).", status),
            Message::FlexibleUpdateCanceled => "Flexible update canceled.".to_string(),
            Message::FlexiblePollTimeout(secs) => format!("Flexible update did not finish within {} seconds, giving up.", secs),
            Message::StatusQueryFailed(error) => format!("Failed to retrieve update status: {}", error),
            Message::UpdateSessionFinished(status) => format!("Update session finished: {}", status),

            // === STORE MESSAGES ===
            Message::StoreNotConfigured => "Distribution store is not configured. Run 'appup init' first.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleStore => "Distribution store configuration".to_string(),
            Message::ConfigModuleUpdater => "Updater configuration".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptStoreApiUrl => "Enter the distribution store API URL".to_string(),
            Message::PromptStoreAuthToken => "Enter your store access token".to_string(),
            Message::PromptPollInterval => "Poll interval in seconds for flexible update status".to_string(),
            Message::PromptImmediateThreshold => "Priority threshold that forces an immediate update".to_string(),
            Message::PromptFlexibleThreshold => "Priority threshold that permits a flexible update".to_string(),
            Message::PromptMaxPollDuration => "Maximum polling duration in seconds (0 = unbounded)".to_string(),
        };

        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_messages() {
        assert_eq!(Message::PriorityLevelReceived(4).to_string(), "Priority level 4");
        assert_eq!(
            Message::AvailabilityQueryFailed("network error: timeout".to_string()).to_string(),
            "Failed to get update info: network error: timeout"
        );
        assert_eq!(
            Message::FlexibleUpdateAborted("canceled".to_string()).to_string(),
            "Flexible update failed or was canceled (canceled)."
        );
    }

    #[test]
    fn test_static_messages() {
        assert_eq!(Message::NoUpdateAvailable.to_string(), "No update available.");
        assert_eq!(Message::NoSuitableUpdateType.to_string(), "No suitable update type available.");
    }
}
