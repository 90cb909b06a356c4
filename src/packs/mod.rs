// Prompt packs
//
// - Pack discovery (list/resolve pack.json manifests under the pack root)
// - File materialization into the target repository
// - Registry of installed packs (.agent/promptkit/registry.json)
// - Installation orchestration

pub mod installer;
pub mod materialize;
pub mod pack;
pub mod registry;

// Re-export commonly used types
pub use installer::{InstallReport, PackInstaller};
pub use materialize::FileStatus;
pub use pack::{Pack, PackFile, PackStore};
pub use registry::{FileRecord, InstalledPack, Provenance, Registry};
