use serde::Deserialize;

/// Settings for talking to the task API.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing `/tasks`.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `TASKBOARD_`-prefixed environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("TASKBOARD"))
            .build()?;
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        let config: ClientConfig = settings.try_deserialize()?;
        Ok(config)
    }
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
