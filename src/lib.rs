// Library interface for promptkit

pub mod agents_md;
pub mod config;
pub mod error;
pub mod packs;

// Re-export commonly used types
pub use config::Config;
pub use error::{PromptkitError, Result};
