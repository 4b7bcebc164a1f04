use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "moodmix.toml",
    "config/moodmix.toml",
    "crates/config/moodmix.toml",
    "../moodmix.toml",
    "../config/moodmix.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub agent: AgentConfig,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

/// Settings for the conversational mood agent.
///
/// ```
/// use moodmix_config::AgentConfig;
///
/// let agent = AgentConfig::default();
/// assert_eq!(agent.name, "DJAgent");
/// assert_eq!(agent.session_ttl_seconds, 3600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default = "AgentConfig::default_greeting")]
    pub greeting: String,
    #[serde(default = "AgentConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
}

impl AgentConfig {
    fn default_greeting() -> String {
        "Hi! Tell me how you feel!".to_string()
    }

    const fn default_session_ttl() -> u64 {
        3_600
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "DJAgent".to_string(),
            greeting: Self::default_greeting(),
            session_ttl_seconds: Self::default_session_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "RedisConfig::default_enabled")]
    pub enabled: bool,
}

impl RedisConfig {
    const fn default_enabled() -> bool {
        true
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            enabled: Self::default_enabled(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use moodmix_config::load;
///
/// std::env::remove_var("MOODMIX_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = i64::try_from(defaults.agent.session_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("agent.name", defaults.agent.name.clone())?
        .set_default("agent.greeting", defaults.agent.greeting.clone())?
        .set_default("agent.session_ttl_seconds", session_ttl)?
        .set_default("redis.url", defaults.redis.url.clone())?
        .set_default("redis.enabled", defaults.redis.enabled)?;

    let environment_overrides = config::Environment::with_prefix("MOODMIX").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MOODMIX_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MOODMIX_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded moodmix configuration");
    Ok(config)
}
