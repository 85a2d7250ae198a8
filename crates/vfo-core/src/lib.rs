//! Domain layer of the virtual family office automation engine.
//!
//! Models, pure logic and repository traits. Nothing in this crate touches
//! the filesystem; storage lives in `vfo-infrastructure` and orchestration in
//! `vfo-application`.

pub mod automation;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod nurture;
pub mod pipeline;
pub mod records;
pub mod site_config;
pub mod store;
pub mod template;

// Re-export common types
pub use error::{Result, VfoError};
pub use store::{KeyValueStore, KeyValueStoreExt};
