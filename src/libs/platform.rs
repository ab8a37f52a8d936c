//! Contract between the orchestrator and the distribution platform.
//!
//! The platform's own update delivery mechanics (availability query, download,
//! install) are a black box behind the [`UpdatePlatform`] trait. The
//! orchestrator only ever issues the four narrow requests defined here and
//! branches on their results; everything else (wire protocol, SDK bindings,
//! retry policy) lives behind the implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appup::libs::platform::{UpdateMode, UpdatePlatform};
//!
//! async fn has_update(platform: &dyn UpdatePlatform) -> bool {
//!     matches!(platform.get_availability().await, Ok(info) if info.available)
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Priority value supplied by the caller, sourced from remote configuration.
///
/// The orchestrator treats it as opaque input and only compares it against
/// the configured thresholds; it is never stored or validated beyond that.
pub type PriorityLevel = u8;

/// Errors reported by the distribution platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The request never reached the platform or the connection dropped.
    #[error("network error: {0}")]
    Network(String),
    /// The platform received the request and refused it.
    #[error("platform rejected request: {0}")]
    Rejected(String),
    /// The platform answered with something this client cannot interpret.
    #[error("unexpected platform response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        PlatformError::Network(err.to_string())
    }
}

/// How an update is applied once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Blocks all further application use until installed or the process exits.
    Immediate,
    /// Downloads in the background while the application keeps running;
    /// requires an explicit install trigger once downloaded.
    Flexible,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Immediate => write!(f, "immediate"),
            UpdateMode::Flexible => write!(f, "flexible"),
        }
    }
}

/// Opaque token the platform hands out with an availability result.
///
/// Start-update requests must present the handle from the availability query
/// they branched on; the platform uses it to pin the request to a concrete
/// release artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHandle(pub String);

/// Result of an availability query. Immutable once obtained; a fresh one is
/// fetched for every status poll rather than reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityInfo {
    /// Whether a newer build exists on the platform.
    pub available: bool,
    /// Modes the platform permits for this particular update.
    pub allowed_modes: Vec<UpdateMode>,
    /// Platform token required to start the update.
    pub handle: UpdateHandle,
}

impl AvailabilityInfo {
    /// Checks whether the platform permits the given mode for this update.
    pub fn is_mode_allowed(&self, mode: UpdateMode) -> bool {
        self.allowed_modes.contains(&mode)
    }
}

/// Platform-reported state of an update session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// The platform cannot say what is happening. Treated as terminal failure.
    Unknown,
    /// The request was accepted but the download has not begun.
    Pending,
    /// Bytes are flowing.
    Downloading,
    /// The artifact is on disk and ready to install.
    Downloaded,
    /// The platform is applying the update.
    Installing,
    /// The update has been applied.
    Installed,
    /// The platform gave up on the update.
    Failed,
    /// The user or the platform canceled the update.
    Canceled,
}

impl DownloadStatus {
    /// Whether no further progress transition can occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadStatus::Downloaded
                | DownloadStatus::Installed
                | DownloadStatus::Failed
                | DownloadStatus::Canceled
                | DownloadStatus::Unknown
        )
    }

    /// Whether this status ends a session without an install being possible.
    pub fn is_failure(&self) -> bool {
        matches!(self, DownloadStatus::Failed | DownloadStatus::Canceled | DownloadStatus::Unknown)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownloadStatus::Unknown => "unknown",
            DownloadStatus::Pending => "pending",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Downloaded => "downloaded",
            DownloadStatus::Installing => "installing",
            DownloadStatus::Installed => "installed",
            DownloadStatus::Failed => "failed",
            DownloadStatus::Canceled => "canceled",
        };
        write!(f, "{}", name)
    }
}

/// One status poll result. Fetched fresh for every poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Current platform-reported session state.
    pub status: DownloadStatus,
    /// Bytes downloaded so far, when the platform reports progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_downloaded: Option<u64>,
    /// Total artifact size, when the platform reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
}

/// The distribution platform's update capability as the orchestrator sees it.
///
/// All four requests may suspend. Implementations are expected to be cheap to
/// share (`Arc<dyn UpdatePlatform>`); the orchestrator and any number of
/// background sessions hold clones of the same instance.
#[async_trait]
pub trait UpdatePlatform: Send + Sync {
    /// Queries whether a newer build is available and which modes it permits.
    async fn get_availability(&self) -> Result<AvailabilityInfo, PlatformError>;

    /// Requests that the platform start the update in the given mode.
    ///
    /// For [`UpdateMode::Immediate`] a successful return means the platform
    /// finished the blocking flow; for [`UpdateMode::Flexible`] it only means
    /// the download request was accepted.
    async fn start_update(&self, info: &AvailabilityInfo, mode: UpdateMode) -> Result<(), PlatformError>;

    /// Fetches the current session status for polling.
    async fn get_status(&self) -> Result<StatusReport, PlatformError>;

    /// Triggers installation of a downloaded flexible update.
    async fn complete_update(&self) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_gating() {
        let info = AvailabilityInfo {
            available: true,
            allowed_modes: vec![UpdateMode::Flexible],
            handle: UpdateHandle("r-42".to_string()),
        };
        assert!(info.is_mode_allowed(UpdateMode::Flexible));
        assert!(!info.is_mode_allowed(UpdateMode::Immediate));
    }

    #[test]
    fn test_terminal_statuses() {
        for status in [
            DownloadStatus::Downloaded,
            DownloadStatus::Installed,
            DownloadStatus::Failed,
            DownloadStatus::Canceled,
            DownloadStatus::Unknown,
        ] {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
        for status in [DownloadStatus::Pending, DownloadStatus::Downloading, DownloadStatus::Installing] {
            assert!(!status.is_terminal(), "{} should not be terminal", status);
        }
    }

    #[test]
    fn test_failure_statuses_exclude_downloaded() {
        assert!(DownloadStatus::Failed.is_failure());
        assert!(DownloadStatus::Canceled.is_failure());
        assert!(DownloadStatus::Unknown.is_failure());
        assert!(!DownloadStatus::Downloaded.is_failure());
        assert!(!DownloadStatus::Installed.is_failure());
    }

    #[test]
    fn test_status_wire_format() {
        let report: StatusReport = serde_json::from_str(r#"{"status":"downloading","bytes_downloaded":512,"total_bytes":2048}"#).unwrap();
        assert_eq!(report.status, DownloadStatus::Downloading);
        assert_eq!(report.bytes_downloaded, Some(512));
        assert_eq!(report.total_bytes, Some(2048));
    }
}
