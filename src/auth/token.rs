use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this long before their real expiry so a
/// request never leaves with a token that dies in flight.
const EXPIRY_MARGIN_SECS: i64 = 10;

/// OAuth2 credential persisted by the credential store.
///
/// Field names match the JSON layout of a `token.json` written by other
/// Google OAuth clients, so an existing file can be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        refresh_token: Option<String>,
        expires_in: Option<std::time::Duration>,
    ) -> Self {
        // A lifetime too large to represent is stored as no expiry.
        let expiry = expires_in
            .and_then(|d| Duration::from_std(d).ok())
            .and_then(|d| Utc::now().checked_add_signed(d));

        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            refresh_token,
            expiry,
        }
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expiry,
            None => false,
        }
    }

    pub fn authorization_header(&self) -> String {
        if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer") {
            format!("Bearer {}", self.access_token)
        } else {
            format!("{} {}", self.token_type, self.access_token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new(
            "T",
            "Bearer",
            Some("R".to_string()),
            Some(std::time::Duration::from_secs(3600)),
        );

        assert_eq!(token.access_token, "T");
        assert_eq!(token.refresh_token.as_deref(), Some("R"));
        assert!(!token.is_expired());

        let remaining = token.expiry.unwrap() - Utc::now();
        assert!(remaining <= Duration::seconds(3600));
        assert!(remaining > Duration::seconds(3500));
    }

    #[test]
    fn test_huge_lifetime_means_no_expiry() {
        let token = Token::new(
            "T",
            "Bearer",
            None,
            Some(std::time::Duration::from_secs(10u64.pow(15))),
        );

        assert_eq!(token.expiry, None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_expiry_margin() {
        let mut token = Token::new("T", "Bearer", None, None);
        assert!(!token.is_expired());

        token.expiry = Some(Utc::now() + Duration::seconds(5));
        assert!(token.is_expired());

        token.expiry = Some(Utc::now() - Duration::seconds(1));
        assert!(token.is_expired());
    }

    #[test]
    fn test_authorization_header() {
        let token = Token::new("abc", "bearer", None, None);
        assert_eq!(token.authorization_header(), "Bearer abc");

        let token = Token::new("abc", "MAC", None, None);
        assert_eq!(token.authorization_header(), "MAC abc");
    }

    #[test]
    fn test_reads_existing_token_file_layout() {
        let json = r#"{
            "access_token": "ya29.a0Af",
            "token_type": "Bearer",
            "refresh_token": "1//0g",
            "expiry": "2026-10-18T16:04:05.123456789-07:00"
        }"#;

        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "ya29.a0Af");
        assert_eq!(token.refresh_token.as_deref(), Some("1//0g"));
        assert!(token.expiry.is_some());
    }
}
