use std::{fs, net::SocketAddr, path::Path, time::Duration};

use eyre::eyre;
use serde::Deserialize;
use tracing::info;
use url::Url;

/// The fully resolved config. Every field has a value, either from the user's
/// config or from config-base.toml.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub backend: BackendConfig,
    pub sessions: SessionsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub search_timeout: Duration,
    pub summary_timeout: Duration,
    pub compare_timeout: Duration,
    pub warmup: WarmupConfig,
}

#[derive(Debug, Clone)]
pub struct WarmupConfig {
    pub enabled: bool,
    pub retries: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionsConfig {
    pub max_idle: Duration,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub site_name: String,
    pub show_version_info: bool,
}

/// The config as it's written in a toml file, where anything may be missing.
#[derive(Deserialize, Debug, Default)]
pub struct PartialConfig {
    #[serde(default)]
    pub bind: Option<SocketAddr>,
    #[serde(default)]
    pub backend: PartialBackendConfig,
    #[serde(default)]
    pub sessions: PartialSessionsConfig,
    #[serde(default)]
    pub ui: PartialUiConfig,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialBackendConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub search_timeout_secs: Option<u64>,
    #[serde(default)]
    pub summary_timeout_secs: Option<u64>,
    #[serde(default)]
    pub compare_timeout_secs: Option<u64>,
    #[serde(default)]
    pub warmup: PartialWarmupConfig,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialWarmupConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialSessionsConfig {
    #[serde(default)]
    pub max_idle_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialUiConfig {
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub show_version_info: Option<bool>,
}

impl Config {
    pub fn read_or_create(config_path: &Path) -> eyre::Result<Self> {
        let base_config_str = include_str!("../config-base.toml");
        let mut config: PartialConfig = toml::from_str(base_config_str)?;

        if !config_path.exists() {
            info!("No config found, creating one at {config_path:?}");
            let default_config_str = include_str!("../config-default.toml");
            fs::write(config_path, default_config_str)?;
        }

        let given_config = toml::from_str::<PartialConfig>(&fs::read_to_string(config_path)?)?;
        config.update(given_config);
        Config::try_from(config)
    }
}

impl PartialConfig {
    // Update the current config with the given config. This is used to make it so
    // the config-base.toml is always used as a fallback if the user decides to
    // use the default for something.
    pub fn update(&mut self, new: PartialConfig) {
        self.bind = new.bind.or(self.bind);

        let backend = &mut self.backend;
        backend.base_url = new.backend.base_url.or(backend.base_url.take());
        backend.search_timeout_secs = new
            .backend
            .search_timeout_secs
            .or(backend.search_timeout_secs);
        backend.summary_timeout_secs = new
            .backend
            .summary_timeout_secs
            .or(backend.summary_timeout_secs);
        backend.compare_timeout_secs = new
            .backend
            .compare_timeout_secs
            .or(backend.compare_timeout_secs);
        backend.warmup.enabled = new.backend.warmup.enabled.or(backend.warmup.enabled);
        backend.warmup.retries = new.backend.warmup.retries.or(backend.warmup.retries);
        backend.warmup.delay_ms = new.backend.warmup.delay_ms.or(backend.warmup.delay_ms);

        self.sessions.max_idle_secs = new.sessions.max_idle_secs.or(self.sessions.max_idle_secs);

        self.ui.site_name = new.ui.site_name.or(self.ui.site_name.take());
        self.ui.show_version_info = new.ui.show_version_info.or(self.ui.show_version_info);
    }
}

fn required<T>(value: Option<T>, name: &str) -> eyre::Result<T> {
    value.ok_or_else(|| eyre!("missing config value `{name}`"))
}

impl TryFrom<PartialConfig> for Config {
    type Error = eyre::Report;

    fn try_from(partial: PartialConfig) -> eyre::Result<Self> {
        let PartialConfig {
            bind,
            backend,
            sessions,
            ui,
        } = partial;

        let base_url = required(backend.base_url, "backend.base_url")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| eyre!("invalid backend.base_url {base_url:?}: {e}"))?;

        Ok(Self {
            bind: required(bind, "bind")?,
            backend: BackendConfig {
                base_url,
                search_timeout: Duration::from_secs(required(
                    backend.search_timeout_secs,
                    "backend.search_timeout_secs",
                )?),
                summary_timeout: Duration::from_secs(required(
                    backend.summary_timeout_secs,
                    "backend.summary_timeout_secs",
                )?),
                compare_timeout: Duration::from_secs(required(
                    backend.compare_timeout_secs,
                    "backend.compare_timeout_secs",
                )?),
                warmup: WarmupConfig {
                    enabled: required(backend.warmup.enabled, "backend.warmup.enabled")?,
                    retries: required(backend.warmup.retries, "backend.warmup.retries")?,
                    delay: Duration::from_millis(required(
                        backend.warmup.delay_ms,
                        "backend.warmup.delay_ms",
                    )?),
                },
            },
            sessions: SessionsConfig {
                max_idle: Duration::from_secs(required(
                    sessions.max_idle_secs,
                    "sessions.max_idle_secs",
                )?),
            },
            ui: UiConfig {
                site_name: required(ui.site_name, "ui.site_name")?,
                show_version_info: required(ui.show_version_info, "ui.show_version_info")?,
            },
        })
    }
}

#[cfg(test)]
impl Config {
    /// The base config pointed at the given backend. Used by tests that run
    /// against a mock server.
    pub fn for_backend(base_url: &str) -> Self {
        let mut config: PartialConfig =
            toml::from_str(include_str!("../config-base.toml")).unwrap();
        config.backend.base_url = Some(base_url.to_string());
        Config::try_from(config).unwrap()
    }
}
