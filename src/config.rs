use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::wizard::WizardOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to every wizard created by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Let `can_go_next` report true regardless of step validity
    #[serde(default)]
    pub allow_skip_steps: bool,
    /// Validate the current step before advancing (default: true)
    #[serde(default = "default_validate_on_next")]
    pub validate_on_next: bool,
    /// Upper bound on a single validator run; unset waits forever
    #[serde(default)]
    pub validator_timeout_ms: Option<u64>,
}

fn default_validate_on_next() -> bool {
    true
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            allow_skip_steps: false,
            validate_on_next: default_validate_on_next(),
            validator_timeout_ms: None,
        }
    }
}

impl From<&WizardConfig> for WizardOptions {
    fn from(config: &WizardConfig) -> Self {
        WizardOptions {
            initial_step: 0,
            allow_skip_steps: config.allow_skip_steps,
            validate_on_next: config.validate_on_next,
            validator_timeout: config.validator_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file instead of stderr
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    ".gymflow/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Project-local config, relative to the working directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".gymflow/config.toml")
    }

    /// Per-user config under the platform config dir, if one exists
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gymflow").join("config.toml"))
    }

    /// Config files that exist on disk, lowest precedence first
    fn discovered_files() -> Vec<PathBuf> {
        std::iter::once(Self::project_config_path())
            .chain(Self::user_config_path())
            .filter(|path| path.exists())
            .collect()
    }

    /// Resolve the effective config.
    ///
    /// Later layers win: built-in defaults, `.gymflow/config.toml`, the user
    /// file, `config_path` (from `--config`), then `GYMFLOW__SECTION__KEY`
    /// variables such as `GYMFLOW__WIZARD__ALLOW_SKIP_STEPS=true`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = serde_json::to_string(&Config::default())
            .context("Failed to serialize built-in config defaults")?;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(&defaults, config::FileFormat::Json));

        for path in Self::discovered_files() {
            tracing::trace!(path = %path.display(), "config layer");
            builder = builder.add_source(config::File::from(path));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix("GYMFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Write this config as TOML to the project config path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::project_config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to render config as TOML")?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Get absolute path to the logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    pub fn wizard_options(&self) -> WizardOptions {
        WizardOptions::from(&self.wizard)
    }
}
