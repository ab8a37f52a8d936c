//! API client modules for the distribution platform.
//!
//! Holds the HTTP binding that implements the [`UpdatePlatform`] contract
//! against a distribution store's update endpoints. The orchestration core
//! never talks HTTP directly; it only sees the trait.
//!
//! [`UpdatePlatform`]: crate::libs::platform::UpdatePlatform

// API client modules
pub mod store;

// Re-export configuration structs for easier access from other modules
pub use store::StoreConfig;
