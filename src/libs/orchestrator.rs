//! Update orchestration: decide between immediate and flexible update paths.
//!
//! The [`UpdateOrchestrator`] is the single long-lived component of this
//! crate. The application's composition root constructs it once at startup
//! and invokes [`check_for_update`](UpdateOrchestrator::check_for_update)
//! with the externally supplied priority level. The orchestrator queries the
//! platform for availability, then branches:
//!
//! - priority at or above the immediate threshold with Immediate allowed →
//!   the **immediate path** runs in the caller's task and shuts the process
//!   down if the platform does not complete the update (fail-closed);
//! - otherwise, priority at or above the flexible threshold with Flexible
//!   allowed → a **flexible session** is spawned as a background task and
//!   the call returns immediately;
//! - otherwise nothing happens beyond a log line.
//!
//! Immediate is strictly preferred over Flexible whenever both its threshold
//! and its platform capability are satisfied. No error is ever surfaced to
//! the caller; every failure is reported through the message channel only.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use appup::libs::config::UpdaterConfig;
//! use appup::libs::exit::ProcessExit;
//! use appup::libs::orchestrator::UpdateOrchestrator;
//! # async fn wire(platform: Arc<dyn appup::libs::platform::UpdatePlatform>) {
//! let orchestrator = UpdateOrchestrator::new(platform, UpdaterConfig::default(), Arc::new(ProcessExit));
//! orchestrator.check_for_update(3).await;
//! # }
//! ```

use crate::libs::config::UpdaterConfig;
use crate::libs::exit::Terminator;
use crate::libs::messages::Message;
use crate::libs::platform::{AvailabilityInfo, PriorityLevel, UpdateMode, UpdatePlatform};
use crate::libs::session::{FlexibleSession, SessionHandle};
use crate::{msg_debug, msg_error, msg_info};
use parking_lot::Mutex;
use std::sync::Arc;

/// Drives the update decision and, for background updates, hands the full
/// lifecycle off to a spawned session.
///
/// At most one flexible session is in flight at a time: a `check_for_update`
/// call that arrives while a session is still running is rejected with a
/// logged no-op.
pub struct UpdateOrchestrator {
    platform: Arc<dyn UpdatePlatform>,
    config: UpdaterConfig,
    exit: Arc<dyn Terminator>,
    active: Mutex<Option<SessionHandle>>,
}

impl UpdateOrchestrator {
    /// Creates the orchestrator. Intended to be called once at startup and
    /// kept alive for the application's lifetime.
    pub fn new(platform: Arc<dyn UpdatePlatform>, config: UpdaterConfig, exit: Arc<dyn Terminator>) -> Self {
        Self {
            platform,
            config,
            exit,
            active: Mutex::new(None),
        }
    }

    /// Checks for an update and runs the appropriate path.
    ///
    /// Fire-and-forget: the immediate path runs to completion (or process
    /// exit) before this returns, the flexible path is handed off to a
    /// background task, and every other outcome is a logged no-op. Nothing
    /// is returned to the caller in any case.
    pub async fn check_for_update(&self, priority: PriorityLevel) {
        msg_debug!(Message::PriorityLevelReceived(priority));

        let info = match self.platform.get_availability().await {
            Ok(info) => info,
            Err(e) => {
                // No retry here; retry policy, if any, belongs to the caller.
                msg_error!(Message::AvailabilityQueryFailed(e.to_string()));
                return;
            }
        };

        if !info.available {
            msg_info!(Message::NoUpdateAvailable);
            return;
        }

        if priority >= self.config.immediate_threshold && info.is_mode_allowed(UpdateMode::Immediate) {
            self.run_immediate(info).await;
        } else if priority >= self.config.flexible_threshold && info.is_mode_allowed(UpdateMode::Flexible) {
            self.launch_flexible(info);
        } else {
            msg_info!(Message::NoSuitableUpdateType);
        }
    }

    /// Immediate path: block on the platform's full update flow.
    ///
    /// On success the platform restarts the application, so this code path is
    /// rarely observed past the start request. Any error shuts the process
    /// down: an immediate-priority update that did not complete must not
    /// leave the application running on a stale build.
    async fn run_immediate(&self, info: AvailabilityInfo) {
        msg_info!(Message::ImmediateUpdateStarting);

        match self.platform.start_update(&info, UpdateMode::Immediate).await {
            Ok(()) => msg_info!(Message::ImmediateUpdateSucceeded),
            Err(e) => {
                msg_error!(Message::ImmediateUpdateFailed(e.to_string()));
                self.exit.terminate();
            }
        }
    }

    /// Flexible path: spawn the background session and return immediately.
    fn launch_flexible(&self, info: AvailabilityInfo) {
        let mut active = self.active.lock();
        if let Some(handle) = active.as_ref() {
            if !handle.is_finished() {
                msg_info!(Message::UpdateAlreadyInProgress);
                return;
            }
        }
        *active = Some(FlexibleSession::spawn(self.platform.clone(), info, self.config.clone()));
    }

    /// Whether a flexible session is currently running.
    pub fn session_active(&self) -> bool {
        self.active.lock().as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Signals the active flexible session, if any, to stop.
    ///
    /// Added capability over the original flow, which exposes no cancellation;
    /// nothing in this crate calls it on its own.
    pub fn cancel_session(&self) {
        if let Some(handle) = self.active.lock().as_ref() {
            handle.cancel();
        }
    }

    /// Detaches and returns the current session handle, running or finished.
    ///
    /// Lets a composition root await the session before process exit (a CLI
    /// would otherwise drop the background task when `main` returns).
    pub fn take_session(&self) -> Option<SessionHandle> {
        self.active.lock().take()
    }
}
