//! # Beard Common Library
//!
//! Shared code for the Beard console crates:
//! - Error type and result alias
//! - Configuration loading and server URL resolution
//! - Console event types (ConsoleEvent enum) and EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{ConsoleEvent, EventBus, Lifecycle, Workflow};
