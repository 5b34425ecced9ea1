//! Backup Rotator Library
//!
//! Rotating directory backup engine: full timestamped copies of a source
//! tree, count-based retention, and daily catch-up scheduling.

pub mod config;
pub mod copier;
pub mod events;
pub mod history;
pub mod orchestrator;
pub mod retention;
pub mod schedule;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use events::BackupNotice;
pub use orchestrator::BackupOrchestrator;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
