#[derive(Debug, Clone)]
pub enum Message {
    // === AVAILABILITY MESSAGES ===
    PriorityLevelReceived(u8),
    NoUpdateAvailable,
    NoSuitableUpdateType,
    AvailabilityQueryFailed(String),
    UpdateAlreadyInProgress,

    // === IMMEDIATE UPDATE MESSAGES ===
    ImmediateUpdateStarting,
    ImmediateUpdateSucceeded,
    ImmediateUpdateFailed(String), // platform error

    // === FLEXIBLE UPDATE MESSAGES ===
    FlexibleUpdateStarting,
    FlexibleUpdateStarted,
    FlexibleStartFailed(String), // platform error
    FlexibleUpdateDownloaded,
    FlexibleUpdateInstalled,
    FlexibleInstallFailed(String),  // platform error
    FlexibleUpdateAborted(String),  // terminal status
    FlexibleUpdateCanceled,
    FlexiblePollTimeout(u64),    // configured bound in seconds
    StatusQueryFailed(String),   // platform error
    UpdateSessionFinished(String), // terminal status

    // === STORE MESSAGES ===
    StoreNotConfigured,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleStore,
    ConfigModuleUpdater,

    // === PROMPTS ===
    PromptSelectModules,
    PromptStoreApiUrl,
    PromptStoreAuthToken,
    PromptPollInterval,
    PromptImmediateThreshold,
    PromptFlexibleThreshold,
    PromptMaxPollDuration,
}
