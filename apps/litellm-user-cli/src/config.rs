//! Layered CLI configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. YAML file given with `--config`
//! 3. environment: `LITELLM__*` with `__` nesting
//!    (`LITELLM__PROVIDER__BASE_URL`), plus the `LITELLM_API_BASE` and
//!    `LITELLM_API_KEY` shortcuts
//! 4. command-line flags

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use litellm_user::ProviderConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "LITELLM__";
pub const ENV_API_BASE: &str = "LITELLM_API_BASE";
pub const ENV_API_KEY: &str = "LITELLM_API_KEY";

const DEFAULT_STATE_FILE: &str = "litellm-users.state.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Required by every command that talks to the proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            provider: None,
            logging: LoggingConfig::default(),
            state_file: default_state_file(),
        }
    }
}

/// Flag values that override every other source.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub state_file: Option<PathBuf>,
}

impl CliConfig {
    /// Merge all sources into one configuration.
    ///
    /// # Errors
    ///
    /// Fails when an explicit config file is missing or any source does not
    /// match the configuration schema.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(CliConfig::default()));

        if let Some(path) = config_path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file_exact(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let figment = with_shortcuts(
            figment,
            std::env::var(ENV_API_BASE).ok(),
            std::env::var(ENV_API_KEY).ok(),
            overrides,
        );

        figment
            .extract::<CliConfig>()
            .context("invalid configuration")
    }

    /// Provider settings, validated.
    ///
    /// # Errors
    ///
    /// Fails when no provider is configured or its settings are invalid.
    pub fn provider(&self) -> Result<&ProviderConfig> {
        let provider = self.provider.as_ref().with_context(|| {
            format!(
                "provider.base_url is not configured (use --base-url, {ENV_API_BASE} or a config file)"
            )
        })?;
        provider.validate().context("invalid provider configuration")?;
        Ok(provider)
    }

    /// Configuration rendered as YAML, secrets redacted.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration")
    }
}

/// Layer the env shortcuts and flags over `figment`.
///
/// The API key only lands in `provider` once a base URL is known; a lone key
/// would leave a `provider` section that cannot be deserialized.
fn with_shortcuts(
    mut figment: Figment,
    env_base: Option<String>,
    env_key: Option<String>,
    overrides: &CliOverrides,
) -> Figment {
    if let Some(base) = env_base {
        figment = figment.merge(Serialized::default("provider.base_url", base));
    }
    if let Some(base) = &overrides.base_url {
        figment = figment.merge(Serialized::default("provider.base_url", base));
    }
    if let Some(key) = env_key
        && figment.contains("provider.base_url")
    {
        figment = figment.merge(Serialized::default("provider.api_key", key));
    }
    if let Some(state_file) = &overrides.state_file {
        figment = figment.merge(Serialized::default("state_file", state_file));
    }
    figment
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_file_is_loaded() {
        let file = write_yaml(
            "provider:\n  base_url: https://proxy.example.com\n  api_key: sk-yaml\n  request_timeout: 10s\nlogging:\n  format: json\n",
        );
        let cfg = CliConfig::load(Some(file.path()), &CliOverrides::default()).unwrap();
        let provider = cfg.provider().unwrap();
        assert_eq!(provider.base_url.as_str(), "https://proxy.example.com/");
        assert_eq!(provider.request_timeout, std::time::Duration::from_secs(10));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.state_file, PathBuf::from(DEFAULT_STATE_FILE));
    }

    #[test]
    fn flags_override_file() {
        let file = write_yaml("provider:\n  base_url: https://file.example.com\n");
        let overrides = CliOverrides {
            base_url: Some("https://flag.example.com".to_owned()),
            state_file: Some(PathBuf::from("other.json")),
        };
        let cfg = CliConfig::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(
            cfg.provider().unwrap().base_url.as_str(),
            "https://flag.example.com/"
        );
        assert_eq!(cfg.state_file, PathBuf::from("other.json"));
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(CliConfig::default()))
    }

    #[test]
    fn lone_api_key_does_not_break_loading() {
        let figment = with_shortcuts(
            defaults(),
            None,
            Some("sk-env".to_owned()),
            &CliOverrides::default(),
        );
        let cfg: CliConfig = figment.extract().unwrap();
        assert!(cfg.provider.is_none());
        assert!(cfg.provider().unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn api_key_applies_with_flag_base_url() {
        let overrides = CliOverrides {
            base_url: Some("https://flag.example.com".to_owned()),
            state_file: None,
        };
        let figment = with_shortcuts(defaults(), None, Some("sk-env".to_owned()), &overrides);
        let cfg: CliConfig = figment.extract().unwrap();
        let provider = cfg.provider().unwrap();
        assert_eq!(provider.base_url.as_str(), "https://flag.example.com/");
        assert_eq!(provider.api_key.as_ref().unwrap().expose(), "sk-env");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = CliConfig::load(
            Some(Path::new("/nonexistent/litellm.yaml")),
            &CliOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_yaml("provider:\n  base_url: https://p.example.com\n  retries: 3\n");
        assert!(CliConfig::load(Some(file.path()), &CliOverrides::default()).is_err());
    }

    #[test]
    fn provider_is_required_for_proxy_commands() {
        let cfg = CliConfig::default();
        let err = cfg.provider().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn yaml_dump_redacts_api_key() {
        let file = write_yaml("provider:\n  base_url: https://p.example.com\n  api_key: sk-very-secret\n");
        let cfg = CliConfig::load(Some(file.path()), &CliOverrides::default()).unwrap();
        let yaml = cfg.to_yaml().unwrap();
        assert!(!yaml.contains("sk-very-secret"));
        assert!(yaml.contains("REDACTED"));
    }
}
