//! Configuration management for recipebox.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recipebox";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "recipes.db";

/// Default export file name.
const EXPORT_FILE_NAME: &str = "recipes.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECIPEBOX_`, sections separated
///    by a double underscore, e.g. `RECIPEBOX_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/recipebox/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/recipebox/recipes.db`
    pub database_path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when exporting without an explicit output path.
    pub file_name: String,
    /// Indent exported JSON.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration, reading the TOML file at `config_path` or at the
    /// default location. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RECIPEBOX_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the file does not exist, or any
    /// error [`Config::load_from`] reports for it.
    pub fn check_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigValidation {
                message: format!("configuration file not found: {}", path.display()),
            });
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let file_name = self.export_file_name();
        if file_name.is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.file_name must not be empty".to_string(),
            });
        }

        if Path::new(file_name).components().count() != 1 || file_name.contains(['/', '\\']) {
            return Err(Error::ConfigValidation {
                message: format!("export.file_name must be a bare file name: {file_name}"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the path an export is written to when none is given.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(self.export_file_name())
    }

    fn export_file_name(&self) -> &str {
        self.export.file_name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.export.file_name, "recipes.json");
        assert!(config.export.pretty);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_file_name() {
        let mut config = Config::default();
        config.export.file_name = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_validate_file_name_with_directory() {
        let mut config = Config::default();
        config.export.file_name = "exports/recipes.json".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("bare file name"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("recipes.db"));
        assert!(path.to_string_lossy().contains("recipebox"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_export_path() {
        let mut config = Config::default();
        assert_eq!(config.export_path(), PathBuf::from("recipes.json"));

        config.export.file_name = "backup.json".to_string();
        assert_eq!(config.export_path(), PathBuf::from("backup.json"));
    }

    #[test]
    fn test_export_path_is_trimmed() {
        let mut config = Config::default();
        config.export.file_name = " backup.json\t".to_string();

        assert!(config.validate().is_ok());
        assert_eq!(config.export_path(), PathBuf::from("backup.json"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("recipebox"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("recipebox"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.export, ExportConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [storage]
                database_path = "/tmp/cookbook.db"

                [export]
                file_name = "cookbook.json"
                pretty = false
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.database_path(), PathBuf::from("/tmp/cookbook.db"));
            assert_eq!(config.export.file_name, "cookbook.json");
            assert!(!config.export.pretty);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [export]
                file_name = "from-file.json"
                pretty = false
                "#,
            )?;
            jail.set_env("RECIPEBOX_EXPORT__FILE_NAME", "from-env.json");
            jail.set_env("RECIPEBOX_STORAGE__DATABASE_PATH", "/srv/recipes.db");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.export.file_name, "from-env.json");
            assert!(!config.export.pretty);
            assert_eq!(config.database_path(), PathBuf::from("/srv/recipes.db"));
            Ok(())
        });
    }

    #[test]
    fn test_env_value_is_validated() {
        Jail::expect_with(|jail| {
            jail.set_env("RECIPEBOX_EXPORT__FILE_NAME", "out/recipes.json");

            let result = Config::load_from(Some(PathBuf::from("missing.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[export]\nfile_name = \"\"\n")?;

            assert!(Config::load_from(Some(PathBuf::from("config.toml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_check_file() {
        Jail::expect_with(|jail| {
            jail.create_file("good.toml", "[export]\npretty = false\n")?;
            jail.create_file("bad.toml", "[export]\nfile_name = \"a/b.json\"\n")?;
            jail.create_file("broken.toml", "[export\n")?;

            let config = Config::check_file(Path::new("good.toml")).map_err(|e| e.to_string())?;
            assert!(!config.export.pretty);

            assert!(matches!(
                Config::check_file(Path::new("missing.toml")),
                Err(Error::ConfigValidation { .. })
            ));
            assert!(Config::check_file(Path::new("bad.toml")).is_err());
            assert!(matches!(
                Config::check_file(Path::new("broken.toml")),
                Err(Error::ConfigLoad(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }

    #[test]
    fn test_export_config_deserialize() {
        let json = r#"{"file_name": "mine.json"}"#;
        let export: ExportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(export.file_name, "mine.json");
        assert!(export.pretty);
    }

    #[test]
    fn test_storage_config_serialize() {
        let storage = StorageConfig::default();
        let json = serde_json::to_string(&storage).unwrap();
        assert!(json.contains("database_path"));
    }
}
