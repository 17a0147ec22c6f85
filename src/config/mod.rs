pub mod api_keys;
pub mod settings;

pub use api_keys::ApiKeys;
pub use settings::{
    CalendarSettings, GenerationSettings, OAuthSettings, SearchSettings, ServerSettings, Settings,
};
