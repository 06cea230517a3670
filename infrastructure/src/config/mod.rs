//! Configuration file loading for converge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONVERGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./converge.toml` or `./.converge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/converge/config.toml`
//! 5. Fallback: `~/.config/converge/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileActionsConfig, FileAuditConfig, FileConfig, FileOutputConfig, FileRunConfig,
};
pub use loader::ConfigLoader;
