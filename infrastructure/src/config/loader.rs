//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: [&str; 2] = ["parley.toml", ".parley.toml"];

/// Prefix of environment overrides, e.g. `PARLEY_RESPONDER__TOKEN`.
pub const ENV_PREFIX: &str = "PARLEY_";

/// Variables whose text is taken verbatim. The generic env provider parses
/// values, which turns `007` into the number 7.
const VERBATIM_ENV_KEYS: [&str; 7] = [
    "RESPONDER__BASE_URL",
    "RESPONDER__CHAT_PATH",
    "RESPONDER__DELETE_PATH",
    "RESPONDER__TOKEN",
    "RESPONDER__DELETE_TOKEN",
    "SETTINGS__DATA_DIR",
    "LOGGING__CONVERSATION_LOG",
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PARLEY_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./parley.toml` or `./.parley.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/parley/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Self::file_figment(config_path.map(PathBuf::as_path));
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let mut config: FileConfig = figment.extract().map_err(Box::new)?;
        Self::apply_verbatim_env(&mut config);
        Ok(config)
    }

    /// Defaults plus environment overrides, ignoring files (for --no-config)
    pub fn load_env_only() -> Result<FileConfig, Box<figment::Error>> {
        let mut config: FileConfig = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        Self::apply_verbatim_env(&mut config);
        Ok(config)
    }

    /// Re-read string-valued overrides exactly as they appear in the
    /// environment.
    fn apply_verbatim_env(config: &mut FileConfig) {
        let slots: [&mut Option<String>; 7] = [
            &mut config.responder.base_url,
            &mut config.responder.chat_path,
            &mut config.responder.delete_path,
            &mut config.responder.token,
            &mut config.responder.delete_token,
            &mut config.settings.data_dir,
            &mut config.logging.conversation_log,
        ];
        for (key, slot) in VERBATIM_ENV_KEYS.iter().zip(slots) {
            if let Ok(value) = std::env::var(format!("{}{}", ENV_PREFIX, key)) {
                *slot = Some(value);
            }
        }
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Defaults merged with every config file that exists.
    fn file_figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("parley").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| PathBuf::from(*name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./parley.toml or ./.parley.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::ResponderKind;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.responder.provider, ResponderKind::Webhook);
        assert_eq!(config.settings.models.len(), 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("parley"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[responder]
provider = "canned"
canned_delay_ms = 5
"#,
        )
        .unwrap();

        let config: FileConfig = ConfigLoader::file_figment(Some(&path)).extract().unwrap();
        assert_eq!(config.responder.provider, ResponderKind::Canned);
        assert_eq!(config.responder.canned_delay_ms, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.responder.timeout_seconds, 30);
        assert_eq!(config.settings.models.len(), 3);
    }

    #[test]
    fn test_env_overrides_accept_numeric_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("PARLEY_RESPONDER__BASE_URL", "http://localhost:3000");
            jail.set_env("PARLEY_RESPONDER__CHAT_PATH", "2024");
            jail.set_env("PARLEY_RESPONDER__TOKEN", "007123");
            jail.set_env("PARLEY_RESPONDER__DELETE_TOKEN", "true");
            jail.set_env("PARLEY_RESPONDER__TIMEOUT_SECONDS", "5");

            let config = ConfigLoader::load_env_only().unwrap();
            assert_eq!(config.responder.chat_path.as_deref(), Some("2024"));
            assert_eq!(config.responder.token.as_deref(), Some("007123"));
            assert_eq!(config.responder.delete_token.as_deref(), Some("true"));
            assert_eq!(config.responder.timeout_seconds, 5);

            let endpoint = config.responder.webhook_endpoint().unwrap();
            assert_eq!(endpoint.chat_url.as_str(), "http://localhost:3000/2024");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", home.display());
            jail.create_file(
                "custom.toml",
                r#"
[responder]
provider = "canned"
token = "from-file"
canned_delay_ms = 5
"#,
            )?;
            jail.set_env("PARLEY_RESPONDER__TOKEN", "from-env");
            jail.set_env("PARLEY_RESPONDER__PROVIDER", "webhook");

            let config = ConfigLoader::load(Some(&home.join("custom.toml"))).unwrap();
            assert_eq!(config.responder.provider, ResponderKind::Webhook);
            assert_eq!(config.responder.token.as_deref(), Some("from-env"));
            assert_eq!(config.responder.canned_delay_ms, 5);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[responder]\ntimeout_seconds = \"soon\"\n").unwrap();

        let result: Result<FileConfig, _> = ConfigLoader::file_figment(Some(&path)).extract();
        assert!(result.is_err());
    }
}
