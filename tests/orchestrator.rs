#[cfg(test)]
mod tests {
    use appup::libs::config::UpdaterConfig;
    use appup::libs::exit::Terminator;
    use appup::libs::orchestrator::UpdateOrchestrator;
    use appup::libs::platform::{
        AvailabilityInfo, DownloadStatus, PlatformError, StatusReport, UpdateHandle, UpdateMode, UpdatePlatform,
    };
    use appup::libs::session::SessionStatus;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::{Duration, Instant};

    /// Scripted stand-in for the distribution platform. Availability, start
    /// and complete outcomes are fixed up front; status polls consume a
    /// scripted sequence. Every request is counted.
    struct ScriptedPlatform {
        availability_fails: bool,
        start_fails: bool,
        complete_fails: bool,
        info: AvailabilityInfo,
        statuses: Mutex<VecDeque<DownloadStatus>>,
        /// Status returned once the script runs dry; `None` panics instead,
        /// so count-sensitive tests catch an over-polling loop.
        repeat_when_empty: Option<DownloadStatus>,
        availability_calls: AtomicUsize,
        start_calls: Mutex<Vec<UpdateMode>>,
        status_calls: AtomicUsize,
        complete_calls: AtomicUsize,
    }

    impl ScriptedPlatform {
        fn new(info: AvailabilityInfo) -> Self {
            Self {
                availability_fails: false,
                start_fails: false,
                complete_fails: false,
                info,
                statuses: Mutex::new(VecDeque::new()),
                repeat_when_empty: None,
                availability_calls: AtomicUsize::new(0),
                start_calls: Mutex::new(Vec::new()),
                status_calls: AtomicUsize::new(0),
                complete_calls: AtomicUsize::new(0),
            }
        }

        fn with_statuses(mut self, statuses: &[DownloadStatus]) -> Self {
            self.statuses = Mutex::new(statuses.iter().copied().collect());
            self
        }

        fn start_calls(&self) -> Vec<UpdateMode> {
            self.start_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UpdatePlatform for ScriptedPlatform {
        async fn get_availability(&self) -> Result<AvailabilityInfo, PlatformError> {
            self.availability_calls.fetch_add(1, Ordering::SeqCst);
            if self.availability_fails {
                return Err(PlatformError::Network("connection reset".to_string()));
            }
            Ok(self.info.clone())
        }

        async fn start_update(&self, _info: &AvailabilityInfo, mode: UpdateMode) -> Result<(), PlatformError> {
            self.start_calls.lock().unwrap().push(mode);
            if self.start_fails {
                return Err(PlatformError::Rejected("start refused".to_string()));
            }
            Ok(())
        }

        async fn get_status(&self) -> Result<StatusReport, PlatformError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let status = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .or(self.repeat_when_empty)
                .expect("status script exhausted");
            Ok(StatusReport {
                status,
                bytes_downloaded: None,
                total_bytes: None,
            })
        }

        async fn complete_update(&self) -> Result<(), PlatformError> {
            self.complete_calls.fetch_add(1, Ordering::SeqCst);
            if self.complete_fails {
                return Err(PlatformError::Rejected("install refused".to_string()));
            }
            Ok(())
        }
    }

    /// Counts termination requests instead of killing the test runner.
    #[derive(Default)]
    struct CountingExit {
        calls: AtomicUsize,
    }

    impl Terminator for CountingExit {
        fn terminate(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn info(available: bool, modes: &[UpdateMode]) -> AvailabilityInfo {
        AvailabilityInfo {
            available,
            allowed_modes: modes.to_vec(),
            handle: UpdateHandle("rel-1".to_string()),
        }
    }

    fn orchestrator(platform: Arc<ScriptedPlatform>, exit: Arc<CountingExit>, config: UpdaterConfig) -> UpdateOrchestrator {
        UpdateOrchestrator::new(platform, config, exit)
    }

    #[tokio::test]
    async fn test_priority_below_flexible_threshold_offers_nothing() {
        let platform = Arc::new(ScriptedPlatform::new(info(true, &[UpdateMode::Immediate, UpdateMode::Flexible])));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(0).await;

        assert!(platform.start_calls().is_empty(), "no start request for priority 0");
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 0);
        assert!(!orch.session_active());
    }

    #[tokio::test]
    async fn test_immediate_preferred_when_both_modes_allowed() {
        let platform = Arc::new(ScriptedPlatform::new(info(true, &[UpdateMode::Immediate, UpdateMode::Flexible])));
        let exit = Arc::new(CountingExit::default());
        let orch = orchestrator(platform.clone(), exit.clone(), UpdaterConfig::default());

        orch.check_for_update(5).await;

        assert_eq!(platform.start_calls(), vec![UpdateMode::Immediate]);
        assert_eq!(exit.calls.load(Ordering::SeqCst), 0, "successful immediate update must not terminate");
        assert!(!orch.session_active(), "immediate path spawns no background session");
    }

    #[tokio::test]
    async fn test_flexible_chosen_for_mid_priority() {
        let platform = Arc::new(
            ScriptedPlatform::new(info(true, &[UpdateMode::Flexible])).with_statuses(&[DownloadStatus::Downloaded]),
        );
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(2).await;
        let status = orch.take_session().expect("flexible session should be running").join().await;

        assert_eq!(platform.start_calls(), vec![UpdateMode::Flexible]);
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(status, SessionStatus::Installed);
    }

    #[tokio::test]
    async fn test_high_priority_without_immediate_capability_runs_flexible() {
        let platform =
            Arc::new(ScriptedPlatform::new(info(true, &[UpdateMode::Flexible])).with_statuses(&[DownloadStatus::Downloaded]));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(5).await;
        let status = orch.take_session().expect("flexible session should be running").join().await;

        assert_eq!(platform.start_calls(), vec![UpdateMode::Flexible]);
        assert_eq!(status, SessionStatus::Installed);
    }

    #[tokio::test]
    async fn test_unavailable_update_is_idempotent_noop() {
        let platform = Arc::new(ScriptedPlatform::new(info(false, &[UpdateMode::Immediate, UpdateMode::Flexible])));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(5).await;
        orch.check_for_update(5).await;

        assert_eq!(platform.availability_calls.load(Ordering::SeqCst), 2);
        assert!(platform.start_calls().is_empty(), "no start request when nothing is available");
        assert!(!orch.session_active());
        assert!(orch.take_session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_loop_counts_queries_and_waits_between_polls() {
        let platform = Arc::new(ScriptedPlatform::new(info(true, &[UpdateMode::Flexible])).with_statuses(&[
            DownloadStatus::Downloading,
            DownloadStatus::Downloading,
            DownloadStatus::Downloaded,
        ]));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        let started = Instant::now();
        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 3, "exactly one query per scripted status");
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 1, "install triggered exactly once");
        assert_eq!(status, SessionStatus::Installed);
        // Two in-progress polls mean two full poll intervals of waiting.
        assert!(started.elapsed() >= Duration::from_secs(2), "loop must wait between polls");
    }

    #[tokio::test]
    async fn test_canceled_status_ends_session_without_install() {
        let platform = Arc::new(
            ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]))
                .with_statuses(&[DownloadStatus::Downloading, DownloadStatus::Canceled]),
        );
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 2);
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 0, "no install after a canceled download");
        assert_eq!(status, SessionStatus::Canceled);
    }

    #[tokio::test]
    async fn test_unknown_status_is_terminal_failure() {
        let platform =
            Arc::new(ScriptedPlatform::new(info(true, &[UpdateMode::Flexible])).with_statuses(&[DownloadStatus::Unknown]));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(status, SessionStatus::Unknown);
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_immediate_failure_terminates_process_exactly_once() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Immediate]));
        scripted.start_fails = true;
        let platform = Arc::new(scripted);
        let exit = Arc::new(CountingExit::default());
        let orch = orchestrator(platform.clone(), exit.clone(), UpdaterConfig::default());

        orch.check_for_update(4).await;

        assert_eq!(platform.start_calls(), vec![UpdateMode::Immediate], "no retry after a failed start");
        assert_eq!(exit.calls.load(Ordering::SeqCst), 1, "termination invoked exactly once");
    }

    #[tokio::test]
    async fn test_availability_failure_stops_the_invocation() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Immediate, UpdateMode::Flexible]));
        scripted.availability_fails = true;
        let platform = Arc::new(scripted);
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(5).await;

        assert_eq!(platform.availability_calls.load(Ordering::SeqCst), 1, "no retry of a failed query");
        assert!(platform.start_calls().is_empty());
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 0);
    }

    /// Documented quirk, preserved on purpose: a failed flexible start
    /// request is logged but the session continues into the polling loop
    /// anyway instead of aborting.
    #[tokio::test]
    async fn test_flexible_start_error_still_polls_to_completion() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]));
        scripted.start_fails = true;
        let platform = Arc::new(scripted.with_statuses(&[DownloadStatus::Downloaded]));
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 1, "polling ran despite the failed start");
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(status, SessionStatus::Installed);
    }

    #[tokio::test]
    async fn test_status_query_error_fails_the_session() {
        struct FailingStatus(ScriptedPlatform);

        #[async_trait]
        impl UpdatePlatform for FailingStatus {
            async fn get_availability(&self) -> Result<AvailabilityInfo, PlatformError> {
                self.0.get_availability().await
            }
            async fn start_update(&self, info: &AvailabilityInfo, mode: UpdateMode) -> Result<(), PlatformError> {
                self.0.start_update(info, mode).await
            }
            async fn get_status(&self) -> Result<StatusReport, PlatformError> {
                self.0.status_calls.fetch_add(1, Ordering::SeqCst);
                Err(PlatformError::Network("poll dropped".to_string()))
            }
            async fn complete_update(&self) -> Result<(), PlatformError> {
                self.0.complete_update().await
            }
        }

        let platform = Arc::new(FailingStatus(ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]))));
        let orch = UpdateOrchestrator::new(platform.clone(), UpdaterConfig::default(), Arc::new(CountingExit::default()));

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(status, SessionStatus::Failed);
        assert_eq!(platform.0.status_calls.load(Ordering::SeqCst), 1, "loop exits on the first failed query");
        assert_eq!(platform.0.complete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_handle_stops_an_endless_session() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]));
        scripted.repeat_when_empty = Some(DownloadStatus::Downloading);
        let platform = Arc::new(scripted);
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        // Let the session issue a few polls before canceling it.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(orch.session_active());

        orch.cancel_session();
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(status, SessionStatus::Canceled);
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_poll_bound_ends_an_endless_session() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]));
        scripted.repeat_when_empty = Some(DownloadStatus::Downloading);
        let platform = Arc::new(scripted);
        let config = UpdaterConfig {
            max_poll_duration: Some(3),
            ..Default::default()
        };
        let orch = orchestrator(platform.clone(), Arc::default(), config);

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(status, SessionStatus::Failed);
        assert_eq!(platform.complete_calls.load(Ordering::SeqCst), 0);
        assert!(platform.status_calls.load(Ordering::SeqCst) <= 4, "bounded loop must stop polling");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_check_rejected_while_session_active() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]));
        scripted.repeat_when_empty = Some(DownloadStatus::Downloading);
        let platform = Arc::new(scripted);
        let orch = orchestrator(platform.clone(), Arc::default(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        // Give the first session time to issue its start request.
        tokio::time::sleep(Duration::from_millis(10)).await;

        orch.check_for_update(1).await;

        assert_eq!(platform.availability_calls.load(Ordering::SeqCst), 2);
        assert_eq!(platform.start_calls().len(), 1, "second check must not start another session");

        orch.cancel_session();
        orch.take_session().unwrap().join().await;
    }

    #[tokio::test]
    async fn test_flexible_install_failure_is_nonfatal() {
        let mut scripted = ScriptedPlatform::new(info(true, &[UpdateMode::Flexible]));
        scripted.complete_fails = true;
        let platform = Arc::new(scripted.with_statuses(&[DownloadStatus::Downloaded]));
        let exit = Arc::new(CountingExit::default());
        let orch = orchestrator(platform.clone(), exit.clone(), UpdaterConfig::default());

        orch.check_for_update(1).await;
        let status = orch.take_session().unwrap().join().await;

        assert_eq!(status, SessionStatus::Failed);
        assert_eq!(exit.calls.load(Ordering::SeqCst), 0, "flexible install failure never terminates the process");
    }
}
