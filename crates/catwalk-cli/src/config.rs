//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `CATWALK__<SECTION>__<KEY>`, e.g.
//!    `CATWALK__STREAM__DEBUG=true` or `CATWALK__CONTEXT__LANGUAGES=en_GB,de_DE`
//! 3. Config file: `--config`, else `.catwalk.toml` in the current
//!    directory, else `config.toml` in the platform config directory
//! 4. Built-in defaults (always present)
//!
//! Relative paths in a file given with `--config` resolve against that
//! file's directory.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use catwalk_core::domain::{Context, Project};

/// File name of a project-local configuration.
pub const LOCAL_CONFIG_FILE: &str = ".catwalk.toml";

const ENV_PREFIX: &str = "CATWALK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stream: StreamConfig,
    pub context: ContextConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Include trace and source location in failure payloads.
    pub debug: bool,
}

/// Defaults for the request context when no context document is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub locale: String,
    pub default_language: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory searched for `tastic.json` manifests.
    pub tastics_dir: PathBuf,
    /// Directory of stream fixtures served by the fixture handlers.
    pub fixtures_dir: PathBuf,
    /// JSON file of action overrides: namespace → action → controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_overrides: Option<PathBuf>,
    /// JSON configuration schema for node data; node data is left untouched
    /// without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_schema: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            locale: "en_GB".into(),
            default_language: "en_GB".into(),
            languages: vec!["en_GB".into()],
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            tastics_dir: PathBuf::from("tastics"),
            fixtures_dir: PathBuf::from("fixtures"),
            action_overrides: None,
            node_schema: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl ContextConfig {
    /// Build a request context from the configured defaults.
    pub fn to_context(&self) -> Context {
        Context::new(
            self.locale.clone(),
            Project::new("", self.languages.clone(), self.default_language.clone()),
        )
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicitly given `config_file` must exist when `require_file` is
    /// set; the implicit locations are always optional.
    pub fn load(config_file: Option<&PathBuf>, require_file: bool) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        let (path, required) = match config_file {
            Some(path) => (path.clone(), require_file),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration file");
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(required),
        );

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("context.languages"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from '{}'", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has an invalid shape")
    }

    /// Path of the configuration file used when `--config` is not given.
    ///
    /// A `.catwalk.toml` in the current directory wins over the platform
    /// config directory.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return local;
        }
        Self::global_config_path().unwrap_or(local)
    }

    /// `config.toml` in the platform config directory, via `directories`.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "catwalk", "catwalk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Look up a dotted key, e.g. `context.locale`, as a display string.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let found = key
            .split('.')
            .try_fold(&value, |current, segment| current.get(segment))?;
        Some(match found {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Resolve `path` against the directory of the active config file when
    /// it is relative and a config file is in use.
    pub fn resolve_path(&self, path: &Path, config_file: Option<&Path>) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match config_file.and_then(Path::parent) {
            Some(base) if !base.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_sensible() {
        let cfg = AppConfig::default();
        assert!(!cfg.stream.debug);
        assert_eq!(cfg.context.locale, "en_GB");
        assert_eq!(cfg.paths.tastics_dir, PathBuf::from("tastics"));
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catwalk.toml");
        fs::write(
            &path,
            "[stream]\ndebug = true\n\n[context]\nlocale = \"de_DE\"\nlanguages = [\"de_DE\", \"en_GB\"]\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path), true).unwrap();

        assert!(cfg.stream.debug);
        assert_eq!(cfg.context.locale, "de_DE");
        assert_eq!(cfg.context.languages, vec!["de_DE", "en_GB"]);
        assert_eq!(cfg.context.default_language, "en_GB");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(AppConfig::load(Some(&path), true).is_err());
        assert!(AppConfig::load(Some(&path), false).is_ok());
    }

    #[test]
    fn get_reads_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("stream.debug").as_deref(), Some("false"));
        assert_eq!(cfg.get("context.locale").as_deref(), Some("en_GB"));
        assert_eq!(cfg.get("paths.tastics_dir").as_deref(), Some("tastics"));
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn context_is_built_from_config() {
        let context = AppConfig::default().context.to_context();
        assert_eq!(context.locale, "en_GB");
        assert_eq!(context.project.languages, vec!["en_GB"]);
        assert!(!context.session.logged_in);
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let cfg = AppConfig::default();
        let config_file = Path::new("/srv/shop/catwalk.toml");

        assert_eq!(
            cfg.resolve_path(Path::new("tastics"), Some(config_file)),
            PathBuf::from("/srv/shop/tastics")
        );
        assert_eq!(
            cfg.resolve_path(Path::new("/abs/fixtures"), Some(config_file)),
            PathBuf::from("/abs/fixtures")
        );
        assert_eq!(
            cfg.resolve_path(Path::new("tastics"), None),
            PathBuf::from("tastics")
        );
    }
}
