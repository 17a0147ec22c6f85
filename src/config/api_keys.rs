//! Upstream API keys. Both are mandatory: startup aborts when either is
//! missing or blank.

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

#[derive(Clone)]
pub struct ApiKeys {
    pub gemini: String,
    pub youtube: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("gemini", &"<redacted>")
            .field("youtube", &"<redacted>")
            .finish()
    }
}

impl ApiKeys {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{} environment variable not set.", key))
        };

        Ok(Self {
            gemini: fetch(GEMINI_API_KEY)?,
            youtube: fetch(YOUTUBE_API_KEY)?,
        })
    }
}
