//! Core utilities and types shared across all homology crates

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::{load_config, save_config, AlignerConfig, Config, PanelConfig, ScratchConfig};
pub use error::{HomologyError, HomologyResult};
pub use logging::init_logging;
pub use types::AlignerTool;

/// Version information for the homology workspace
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
