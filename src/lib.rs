//! # Appup - In-App Update Orchestration
//!
//! A command-line client that decides whether a newer build is available
//! from the distribution platform and, based on an externally supplied
//! priority level, either forces an uninterruptible update-and-restart or
//! runs a flexible background update the user may ignore.
//!
//! ## Features
//!
//! - **Priority Branching**: Fixed thresholds pick the immediate or flexible path
//! - **Immediate Updates**: Blocking, fail-closed; a failed forced update shuts the process down
//! - **Flexible Updates**: Background download polled to completion, then installed
//! - **Cancellable Sessions**: Background sessions expose a cancellation handle
//! - **Store Binding**: HTTP client implementing the platform contract
//! - **Interactive Setup**: Guided configuration of store and updater settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appup::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
