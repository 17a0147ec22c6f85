use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    pub server: ServerSettings,
    pub oauth: OAuthSettings,
    pub generation: GenerationSettings,
    pub search: SearchSettings,
    pub calendar: CalendarSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory with the frontend served for every unmatched path
    pub static_dir: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OAuthSettings {
    /// Path segment used by `/login/{provider}` and `/callback/{provider}`
    pub provider: String,
    pub client_secret_file: String,
    pub token_file: String,
    /// Space separated scopes
    pub scope: String,
    /// Overrides the first redirect URI of the client-secret file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    pub exchange_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationSettings {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchSettings {
    pub api_base: String,
    pub max_results: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalendarSettings {
    pub api_base: String,
    pub calendar_id: String,
    /// IANA zone sent along with event start/end
    pub time_zone: String,
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            client_secret_file: "credentials.json".to_string(),
            token_file: "token.json".to_string(),
            scope: "https://www.googleapis.com/auth/calendar.events".to_string(),
            redirect_uri: None,
            exchange_timeout_secs: 10,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 10,
            timeout_secs: 30,
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: "primary".to_string(),
            time_zone: "America/Los_Angeles".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OAuthSettings {
    pub fn scopes(&self) -> Vec<String> {
        self.scope.split_whitespace().map(str::to_string).collect()
    }
}

impl Settings {
    /// Built-in defaults, then `config/default`, then `config/{RUN_MODE}`,
    /// then `TUTOR_RELAY__SECTION__KEY` environment variables and `PORT`.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("TUTOR_RELAY").separator("__"));

        // Cloud Run style port injection
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        let s = builder.build()?;

        s.try_deserialize()
    }
}
