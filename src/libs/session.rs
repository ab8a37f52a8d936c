//! Flexible update session: background download with polled completion.
//!
//! A [`FlexibleSession`] owns the state for one flexible update attempt. It
//! issues the start-update request, then polls the platform status at a fixed
//! interval until a terminal status is observed, triggering the install once
//! the download lands. The session runs as an independent background task;
//! the caller that launched it never observes its progress or result, only
//! the logging channel does.
//!
//! A status-query failure ends the session. A *start*-request failure does
//! not: the session logs it and enters the polling loop anyway, preserving
//! the long-standing behavior of the original flow (see the test suite,
//! where this quirk is pinned deliberately).

use crate::libs::config::UpdaterConfig;
use crate::libs::messages::Message;
use crate::libs::platform::{AvailabilityInfo, DownloadStatus, UpdateMode, UpdatePlatform};
use crate::{msg_debug, msg_error, msg_info};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

/// State of a flexible update session.
///
/// `Installed` is the terminal success state; `Failed`, `Canceled` and
/// `Unknown` are terminal failures. Everything else is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Starting,
    Downloading,
    Downloaded,
    Installing,
    Installed,
    Failed,
    Canceled,
    Unknown,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Installed | SessionStatus::Failed | SessionStatus::Canceled | SessionStatus::Unknown
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Starting => "starting",
            SessionStatus::Downloading => "downloading",
            SessionStatus::Downloaded => "downloaded",
            SessionStatus::Installing => "installing",
            SessionStatus::Installed => "installed",
            SessionStatus::Failed => "failed",
            SessionStatus::Canceled => "canceled",
            SessionStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Handle to a running background session.
///
/// The original flow exposes no way to stop a flexible update once launched;
/// the cancellation signal here is an added capability, and nothing cancels
/// by default — an unobserved session simply runs to its terminal state.
pub struct SessionHandle {
    cancel: watch::Sender<bool>,
    join: JoinHandle<SessionStatus>,
}

impl SessionHandle {
    /// Signals the session to stop at its next opportunity (before the next
    /// status query or mid-wait).
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the session task has reached a terminal state and exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the session task and returns its terminal status.
    pub async fn join(self) -> SessionStatus {
        self.join.await.unwrap_or(SessionStatus::Unknown)
    }
}

/// Ephemeral state for one flexible update attempt.
///
/// Owned exclusively by the polling task that runs it; dropped when the task
/// exits.
pub struct FlexibleSession {
    platform: Arc<dyn UpdatePlatform>,
    info: AvailabilityInfo,
    config: UpdaterConfig,
    /// Wall-clock start of the session, for the record.
    pub started_at: DateTime<Utc>,
    /// Last status the platform reported, if any poll succeeded.
    pub last_observed: Option<DownloadStatus>,
    status: SessionStatus,
}

impl FlexibleSession {
    pub fn new(platform: Arc<dyn UpdatePlatform>, info: AvailabilityInfo, config: UpdaterConfig) -> Self {
        Self {
            platform,
            info,
            config,
            started_at: Utc::now(),
            last_observed: None,
            status: SessionStatus::Starting,
        }
    }

    /// Launches the session as an independent background task and returns
    /// its handle. The caller's own control flow continues immediately.
    pub fn spawn(platform: Arc<dyn UpdatePlatform>, info: AvailabilityInfo, config: UpdaterConfig) -> SessionHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let session = FlexibleSession::new(platform, info, config);
        let join = tokio::spawn(session.run(cancel_rx));
        SessionHandle { cancel: cancel_tx, join }
    }

    /// Drives the session to a terminal state.
    ///
    /// Start request, then the polling loop: one fresh status query per
    /// iteration, a fixed wait between in-progress polls, exit on the first
    /// terminal status or on a failed query. The loop is unbounded unless a
    /// maximum poll duration is configured.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) -> SessionStatus {
        msg_info!(Message::FlexibleUpdateStarting);

        if let Err(e) = self.platform.start_update(&self.info, UpdateMode::Flexible).await {
            // Known quirk: the session keeps polling after a failed start
            // request instead of aborting.
            msg_error!(Message::FlexibleStartFailed(e.to_string()));
        } else {
            msg_info!(Message::FlexibleUpdateStarted);
        }

        let deadline = self.config.max_poll_duration.map(|secs| Instant::now() + Duration::from_secs(secs));

        loop {
            if *cancel.borrow() {
                msg_info!(Message::FlexibleUpdateCanceled);
                self.status = SessionStatus::Canceled;
                break;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    msg_error!(Message::FlexiblePollTimeout(self.config.max_poll_duration.unwrap_or_default()));
                    self.status = SessionStatus::Failed;
                    break;
                }
            }

            let report = match self.platform.get_status().await {
                Ok(report) => report,
                Err(e) => {
                    msg_error!(Message::StatusQueryFailed(e.to_string()));
                    self.status = SessionStatus::Failed;
                    break;
                }
            };

            self.last_observed = Some(report.status);
            msg_debug!(format!("update status: {}", report.status));
            if let (Some(done), Some(total)) = (report.bytes_downloaded, report.total_bytes) {
                msg_debug!(format!("downloaded {} of {} bytes", done, total));
            }

            match report.status {
                DownloadStatus::Downloaded => {
                    self.status = self.install().await;
                    break;
                }
                status if status.is_failure() => {
                    msg_error!(Message::FlexibleUpdateAborted(status.to_string()));
                    self.status = match status {
                        DownloadStatus::Canceled => SessionStatus::Canceled,
                        DownloadStatus::Unknown => SessionStatus::Unknown,
                        _ => SessionStatus::Failed,
                    };
                    break;
                }
                _ => {
                    self.status = SessionStatus::Downloading;
                    // Suspend for one poll interval, waking early on cancel.
                    tokio::select! {
                        _ = cancel.changed() => {}
                        _ = time::sleep(Duration::from_secs(self.config.poll_interval)) => {}
                    }
                }
            }
        }

        self.status
    }

    /// Install step: trigger installation of the downloaded update.
    ///
    /// An install failure is logged and non-fatal; the application keeps
    /// running either way, in contrast with the immediate path.
    async fn install(&mut self) -> SessionStatus {
        msg_info!(Message::FlexibleUpdateDownloaded);
        self.status = SessionStatus::Installing;

        match self.platform.complete_update().await {
            Ok(()) => {
                msg_info!(Message::FlexibleUpdateInstalled);
                SessionStatus::Installed
            }
            Err(e) => {
                msg_error!(Message::FlexibleInstallFailed(e.to_string()));
                SessionStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_session_statuses() {
        assert!(SessionStatus::Installed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(SessionStatus::Canceled.is_terminal());
        assert!(SessionStatus::Unknown.is_terminal());
        assert!(!SessionStatus::Starting.is_terminal());
        assert!(!SessionStatus::Downloading.is_terminal());
        assert!(!SessionStatus::Installing.is_terminal());
    }
}
