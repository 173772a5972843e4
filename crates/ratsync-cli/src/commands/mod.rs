pub mod config;
pub mod fetch;
pub mod parse;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratsync_config::{Config, PathManager};
use std::path::PathBuf;

/// Settings shared by every subcommand
pub struct Context {
    config_override: Option<PathBuf>,
    paths: PathManager,
    verbose: u8,
}

impl Context {
    pub fn new(config_override: Option<PathBuf>, verbose: u8) -> Self {
        Self::with_paths(config_override, PathManager::default(), verbose)
    }

    pub fn with_paths(config_override: Option<PathBuf>, paths: PathManager, verbose: u8) -> Self {
        Self {
            config_override,
            paths,
            verbose,
        }
    }

    pub fn paths(&self) -> &PathManager {
        &self.paths
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_override
            .clone()
            .unwrap_or_else(|| self.paths.config_file())
    }

    /// `--log-file` without a value means the standard log location
    pub fn log_file(&self, flag: Option<Option<PathBuf>>) -> Option<PathBuf> {
        flag.map(|path| path.unwrap_or_else(|| self.paths.log_file()))
    }

    /// Command-line directory first, then `movielens.exports_dir`, then `<data_dir>/exports`
    pub fn exports_dir(&self, config: &Config, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| config.exports_dir(&self.paths))
    }

    /// Load the configuration, falling back to defaults when no file exists
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        let config = Config::load_or_default(&path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid config in {}: {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_context(base: &std::path::Path) -> Context {
        Context::with_paths(None, PathManager::with_base(base.to_path_buf()), 0)
    }

    #[test]
    fn test_exports_dir_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let context = create_context(dir.path());
        let mut config = Config::default();

        assert_eq!(context.exports_dir(&config, None), dir.path().join("data/exports"));

        config.movielens.exports_dir = Some(PathBuf::from("/srv/exports"));
        assert_eq!(context.exports_dir(&config, None), PathBuf::from("/srv/exports"));
        assert_eq!(
            context.exports_dir(&config, Some(PathBuf::from("/tmp/override"))),
            PathBuf::from("/tmp/override")
        );
    }

    #[test]
    fn test_exports_dir_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "[movielens]\nexports_dir = \"/data/movielens\"\n").unwrap();
        let context = Context::with_paths(Some(config_path), PathManager::with_base(dir.path().to_path_buf()), 0);

        let config = context.load_config().unwrap();

        assert_eq!(context.exports_dir(&config, None), PathBuf::from("/data/movielens"));
    }

    #[test]
    fn test_log_file_flag() {
        let dir = tempfile::tempdir().unwrap();
        let context = create_context(dir.path());

        assert_eq!(context.log_file(None), None);
        assert_eq!(context.log_file(Some(None)), Some(dir.path().join("logs/ratsync.log")));
        assert_eq!(
            context.log_file(Some(Some(PathBuf::from("/var/log/r.log")))),
            Some(PathBuf::from("/var/log/r.log"))
        );
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[movielens]\npoll_interval_ms = 0\n").unwrap();
        let context = Context::with_paths(Some(config_path), PathManager::with_base(dir.path().to_path_buf()), 0);

        assert!(context.load_config().is_err());
    }
}
