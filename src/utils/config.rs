use std::path::PathBuf;
use std::time::Duration;

const ENV_DATA_DIR: &str = "LIFEOS_DATA_DIR";
const ENV_ASSISTANT_URL: &str = "LIFEOS_ASSISTANT_URL";
const ENV_API_TOKEN: &str = "LIFEOS_API_TOKEN";
const ENV_ASSISTANT_TIMEOUT: &str = "LIFEOS_ASSISTANT_TIMEOUT_SECS";

pub const DEFAULT_DATA_DIR: &str = "lifeos-data";
pub const DEFAULT_ASSISTANT_URL: &str = "http://localhost:8000/chat";
pub const DEFAULT_ASSISTANT_TIMEOUT_SECS: u64 = 30;

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn api_token_from_env() -> Option<String> {
    env_value(ENV_API_TOKEN)
}

pub fn resolve_api_token(explicit_token: Option<&str>) -> Option<String> {
    explicit_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(api_token_from_env)
}

pub fn data_dir_from_env() -> PathBuf {
    env_value(ENV_DATA_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ASSISTANT_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_ASSISTANT_TIMEOUT_SECS),
        }
    }
}

impl AssistantConfig {
    /// Environment values first, built-in defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let timeout_secs = env_value(ENV_ASSISTANT_TIMEOUT)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_ASSISTANT_TIMEOUT_SECS);

        Self {
            endpoint: env_value(ENV_ASSISTANT_URL)
                .unwrap_or_else(|| DEFAULT_ASSISTANT_URL.to_string()),
            api_token: api_token_from_env(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        if let Some(token) = resolve_api_token(token) {
            self.api_token = Some(token);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
