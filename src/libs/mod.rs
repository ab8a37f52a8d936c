//! Core library modules for the appup application.
//!
//! Serves as the main entry point for all appup library components, providing
//! a centralized access point to the update orchestration core.
//!
//! ## Features
//!
//! - **Update Orchestration**: Priority-driven immediate/flexible branching
//! - **Flexible Sessions**: Background download polling with install trigger
//! - **Platform Contract**: The narrow request/response seam to the store
//! - **Core Infrastructure**: Configuration, data storage, messaging
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
//! orchestrator.check_for_update(2).await;
//! # }
//! ```

pub mod config;
pub mod data_storage;
pub mod exit;
pub mod messages;
pub mod orchestrator;
pub mod platform;
pub mod session;
