use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// Process configuration read from config.json at startup. The bot refuses to
/// start without it, so loading failures are fatal to the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "BOT_TOKEN")]
    pub bot_token: String,
    #[serde(rename = "WELCOME_CHANNEL_ID", default)]
    pub welcome_channel_id: Option<u64>,
    #[serde(rename = "ROLE_PREFIX", default = "default_role_prefix")]
    pub role_prefix: String,
}

fn default_role_prefix() -> String {
    "Member".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config: Config = serde_json::from_str(
            r#"{ "BOT_TOKEN": "abc", "WELCOME_CHANNEL_ID": 123, "ROLE_PREFIX": "Citizen" }"#,
        )
        .unwrap();
        assert_eq!(config.bot_token, "abc");
        assert_eq!(config.welcome_channel_id, Some(123));
        assert_eq!(config.role_prefix, "Citizen");
    }

    #[test]
    fn optional_fields_default() {
        let config: Config = serde_json::from_str(r#"{ "BOT_TOKEN": "abc" }"#).unwrap();
        assert_eq!(config.welcome_channel_id, None);
        assert_eq!(config.role_prefix, "Member");
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(serde_json::from_str::<Config>(r#"{ "ROLE_PREFIX": "x" }"#).is_err());
    }
}
