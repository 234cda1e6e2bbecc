//! # Shelver
//!
//! A file librarian: watches incoming folders, classifies each file
//! against ordered rules, and shelves it in the right place in a media
//! library. TV show episodes are renamed to a configurable schema and
//! filed into per-show season folders, reusing existing folders even
//! when their naming style differs from the incoming file's.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and
//! presentation layers:
//! - `core` - The classification and shelving engine
//! - `config` - TOML configuration
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, ShelverError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
