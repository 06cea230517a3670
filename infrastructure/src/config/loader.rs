//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "converge";
const PROJECT_FILES: [&str; 2] = ["converge.toml", ".converge.toml"];
const ENV_PREFIX: &str = "CONVERGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONVERGE_*` environment variables (`CONVERGE_RUN__MAX_ROUNDS=5`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./converge.toml` or `./.converge.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/converge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path(),
            Self::project_config_path(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        explicit: Option<&Path>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(project_path));
        }

        // An explicit path must exist; Toml::file would silently skip it.
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/converge/config.toml if set,
    /// otherwise falls back to ~/.config/converge/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./converge.toml or ./.converge.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.run.max_rounds, 10);
        assert!(!config.actions.run_command);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("converge"));
    }

    #[test]
    fn test_explicit_overrides_project_overrides_global() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("converge.toml");
        let explicit = dir.path().join("explicit.toml");

        fs::write(&global, "[run]\nmax_rounds = 7\nconcurrency = 7\nfailure_limit = 7\n").unwrap();
        fs::write(&project, "[run]\nconcurrency = 5\nfailure_limit = 5\n").unwrap();
        fs::write(&explicit, "[run]\nfailure_limit = 2\n").unwrap();

        let config: FileConfig =
            ConfigLoader::figment(Some(global), Some(project), Some(explicit.as_path()))
                .extract()
                .unwrap();

        assert_eq!(config.run.max_rounds, 7);
        assert_eq!(config.run.concurrency, 5);
        assert_eq!(config.run.failure_limit, 2);
        assert_eq!(config.run.correction_budget, 3);
    }

    #[test]
    fn test_missing_global_is_skipped() {
        let dir = tempdir().unwrap();
        let config: FileConfig =
            ConfigLoader::figment(Some(dir.path().join("absent.toml")), None, None)
                .extract()
                .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let result = ConfigLoader::load(Some(&missing));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("bad.toml");
        fs::write(&explicit, "[run]\nmax_rounds = \"many\"\n").unwrap();

        let result = ConfigLoader::figment(None, None, Some(explicit.as_path())).extract::<FileConfig>();
        assert!(result.is_err());
    }
}
