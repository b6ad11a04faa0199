//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Global config: `$XDG_CONFIG_HOME/appfront/default.toml`
//! 2. App config: `<app_root>/config/default.toml`
//! 3. Site config: `<app_root>/config/site.toml`
//! 4. Environment variables: `APPFRONT__*` prefix, `__` as path separator
//!
//! Compiled defaults live with the readers (`get_str(path, default)` and
//! friends), so an absent key always has a well-defined value.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

/// Environment variable naming the application root directory.
pub const APP_ROOT_VAR: &str = "APPFRONT_ROOT";

/// Only this key is split on `,` when read from the environment.
const NAMESPACE_LIST_KEY: &str = "cli.class-lookup.namespace";

/// Loaded configuration, addressed by `/`-separated paths such as
/// `cli/class-lookup/namespace`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    values: toml::Table,
}

impl AppConfig {
    pub fn from_table(values: toml::Table) -> Self {
        Self { values }
    }

    pub fn from_toml_str(content: &str) -> ApplicationResult<Self> {
        toml::from_str(content)
            .map(Self::from_table)
            .map_err(|e| ApplicationError::Config {
                message: format!("parse config: {e}"),
            })
    }

    pub fn as_table(&self) -> &toml::Table {
        &self.values
    }

    fn lookup(&self, path: &str) -> Option<&toml::Value> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        segments.try_fold(self.values.get(first)?, |value, segment| {
            value.as_table().and_then(|t| t.get(segment))
        })
    }

    pub fn has_param(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&toml::Value> {
        self.lookup(path)
    }

    /// Scalar value as string; non-scalars and absent keys give `default`.
    pub fn get_str(&self, path: &str, default: &str) -> String {
        match self.lookup(path) {
            Some(toml::Value::String(s)) => s.clone(),
            Some(toml::Value::Integer(i)) => i.to_string(),
            Some(toml::Value::Float(f)) => f.to_string(),
            Some(toml::Value::Boolean(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Array at `path`; a scalar is wrapped into a one-element array.
    pub fn get_array(&self, path: &str) -> Vec<toml::Value> {
        match self.lookup(path) {
            Some(toml::Value::Array(items)) => items.clone(),
            Some(toml::Value::Table(_)) | None => Vec::new(),
            Some(scalar) => vec![scalar.clone()],
        }
    }

    /// Array of strings at `path`, or `default` when the key is absent.
    pub fn get_str_array(&self, path: &str, default: &[&str]) -> Vec<String> {
        if !self.has_param(path) {
            return default.iter().map(|s| s.to_string()).collect();
        }
        self.get_array(path)
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn get_table(&self, path: &str) -> Option<&toml::Table> {
        self.lookup(path).and_then(toml::Value::as_table)
    }

    /// Truthiness: booleans, non-zero integers and `true`/`1`/`yes`/`on`.
    pub fn get_bool(&self, path: &str) -> bool {
        match self.lookup(path) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(toml::Value::Integer(i)) => *i != 0,
            Some(toml::Value::String(s)) => {
                matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            _ => false,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(&self.values).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# appfront configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/appfront/default.toml
#   App:    <app_root>/config/default.toml
#   Site:   <app_root>/config/site.toml
#   Env:    APPFRONT__<SECTION>__<KEY> environment variables
#
# Keep keys lowercase; environment overrides are matched case-insensitively.

[debug]
# Show the full failure chain to the user
# enable = false

[cli]
# Commands invoked by program name: identifier -> handler or class name
# [cli.command-map]
# deploy = "cli::command::DeployCommand"

[cli.class-lookup]
# namespace = ["cli::command"]
# prefix = ""
# suffix = "Command"

[cli.di-lookup]
# enable = false
# prefix = ""
# suffix = ""

# [dependency-injection.beans]
# report = { factory = "cli::command::ReportCommand", format = "csv" }
# messages = { "error.unexpected-error" = "Something went wrong" }

# [i18n.dict.en]
# "error.unexpected-error" = "Something went wrong"

# [i18n.di-lookup]
# bean-name = "messages"
"#
        .to_string()
    }
}

/// Source of the application configuration.
pub trait ConfigLoader {
    fn load(&self) -> ApplicationResult<AppConfig>;
}

/// An already built configuration loads as itself.
impl ConfigLoader for AppConfig {
    fn load(&self) -> ApplicationResult<AppConfig> {
        Ok(self.clone())
    }
}

/// Loader for TOML files under `<app_root>/config`.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    app_root: PathBuf,
    files: Vec<String>,
    env_prefix: Option<String>,
    include_global: bool,
}

impl FileConfigLoader {
    /// `app_root` may use `~` and `$VAR`.
    pub fn new(app_root: impl AsRef<Path>) -> Self {
        let raw = app_root.as_ref().to_string_lossy();
        let app_root = shellexpand::full(&raw)
            .map(|s| PathBuf::from(s.as_ref()))
            .unwrap_or_else(|_| app_root.as_ref().to_path_buf());
        Self {
            app_root,
            files: vec!["default.toml".into(), "site.toml".into()],
            env_prefix: Some("APPFRONT".into()),
            include_global: true,
        }
    }

    /// Loader rooted at `$APPFRONT_ROOT`, or the current directory.
    pub fn from_process_env() -> Self {
        let root = std::env::var(APP_ROOT_VAR).unwrap_or_else(|_| ".".into());
        Self::new(root)
    }

    /// Config file names, lowest precedence first.
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn without_global(mut self) -> Self {
        self.include_global = false;
        self
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.app_root.join("config")
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> ApplicationResult<AppConfig> {
        if !self.app_root.is_dir() {
            return Err(ApplicationError::Config {
                message: format!("app root not found: {}", self.app_root.display()),
            });
        }

        let mut builder = Config::builder();

        if self.include_global {
            if let Some(global_path) = global_config_path() {
                debug!("config: global {}", global_path.display());
                builder = builder.add_source(File::from(global_path).format(FileFormat::Toml).required(false));
            }
        }

        for name in &self.files {
            let path = self.config_dir().join(name);
            debug!("config: {} (exists={})", path.display(), path.exists());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key(NAMESPACE_LIST_KEY)
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let values: toml::Table = config.try_deserialize().map_err(config_err)?;
        Ok(AppConfig::from_table(values))
    }
}

/// Get the XDG config directory for appfront.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "appfront").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("default.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig::from_toml_str(
            r#"
[debug]
enable = "yes"

[cli]
flag = 1

[cli.class-lookup]
namespace = ["app::cli", "cli::command"]
suffix = "Cmd"
single = "one"
"#,
        )
        .expect("parse")
    }

    #[test]
    fn given_nested_path_when_has_param_then_walks_tables() {
        let cfg = sample();
        assert!(cfg.has_param("cli/class-lookup/namespace"));
        assert!(cfg.has_param("/cli/class-lookup/"));
        assert!(!cfg.has_param("cli/class-lookup/prefix"));
        assert!(!cfg.has_param("cli/flag/deeper"));
        assert!(!cfg.has_param(""));
    }

    #[test]
    fn given_missing_key_when_get_str_then_default() {
        let cfg = sample();
        assert_eq!(cfg.get_str("cli/class-lookup/suffix", "Command"), "Cmd");
        assert_eq!(cfg.get_str("cli/class-lookup/prefix", ""), "");
        assert_eq!(cfg.get_str("cli/flag", ""), "1");
    }

    #[test]
    fn given_arrays_and_scalars_when_get_str_array_then_normalized() {
        let cfg = sample();
        assert_eq!(
            cfg.get_str_array("cli/class-lookup/namespace", &["cli::command"]),
            vec!["app::cli".to_string(), "cli::command".to_string()]
        );
        assert_eq!(cfg.get_str_array("cli/class-lookup/single", &[]), vec!["one".to_string()]);
        assert_eq!(
            cfg.get_str_array("cli/missing", &["cli::command"]),
            vec!["cli::command".to_string()]
        );
    }

    #[test]
    fn given_truthy_values_when_get_bool_then_true() {
        let cfg = sample();
        assert!(cfg.get_bool("debug/enable"));
        assert!(cfg.get_bool("cli/flag"));
        assert!(!cfg.get_bool("cli/di-lookup/enable"));
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let cfg = AppConfig::from_toml_str(&AppConfig::template()).expect("template parses");
        assert!(cfg.has_param("cli/class-lookup"));
        assert!(!cfg.get_bool("debug/enable"));
    }

    #[test]
    fn given_config_when_to_toml_then_round_trips_values() {
        let cfg = sample();
        let text = cfg.to_toml().expect("serialize");
        let again = AppConfig::from_toml_str(&text).expect("reparse");
        assert_eq!(cfg, again);
    }
}
