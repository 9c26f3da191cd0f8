use crate::error::{BadEnvVarSnafu, ParseEnvVarSnafu, RosterResult};
use dotenvy::var;
use secrecy::SecretString;
use snafu::ResultExt;
use std::{env::VarError, path::PathBuf, sync::Arc, time::Duration};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";
const DEFAULT_DATA_FILE: &str = "students.json";
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;

/// Reads an env var, treating "not set" as `None` but still surfacing other failures (eg. non-unicode values).
fn optional_env_var(name: &'static str) -> RosterResult<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}

fn optional_number_env_var<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    name: &'static str,
    default: T,
) -> RosterResult<T> {
    optional_env_var(name)?.map_or(Ok(default), |raw| {
        raw.trim().parse().context(ParseEnvVarSnafu { name })
    })
}

/// A blank key counts as no key, so `CHAT_API_KEY=` in a `.env` doesn't send an empty bearer token.
fn non_blank_secret(raw: Option<String>) -> Option<SecretString> {
    raw.filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_config: Arc<ServerConfig>,
    chat_config: Arc<ChatConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            server_config: Arc::new(ServerConfig::new()?),
            chat_config: Arc::new(ChatConfig::new()?),
        })
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    pub fn chat_config(&self) -> Arc<ChatConfig> {
        self.chat_config.clone()
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub server_ip: String,
    pub data_file: PathBuf,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            server_ip: optional_env_var("ROSTER_SERVER_IP")?
                .unwrap_or_else(|| DEFAULT_SERVER_IP.to_string()),
            data_file: optional_env_var("ROSTER_DATA_FILE")?
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from),
            body_limit_bytes: optional_number_env_var(
                "ROSTER_BODY_LIMIT_BYTES",
                DEFAULT_BODY_LIMIT_BYTES,
            )?,
        })
    }
}

#[derive(Debug)]
pub struct ChatConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            api_key: non_blank_secret(optional_env_var("CHAT_API_KEY")?),
            base_url: optional_env_var("CHAT_BASE_URL")?
                .unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string()),
            model: optional_env_var("CHAT_MODEL")?
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            timeout: Duration::from_secs(optional_number_env_var(
                "CHAT_TIMEOUT_SECS",
                DEFAULT_CHAT_TIMEOUT_SECS,
            )?),
        })
    }

    /// Endpoint for chat completions, tolerant of a trailing slash on the base URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use secrecy::ExposeSecret;

    // every test uses its own variable names, so parallel tests never see each other's values
    fn set_env(name: &str, value: &str) {
        // SAFETY: no other test touches these names, and nothing here reads the environment from another thread
        unsafe { std::env::set_var(name, value) };
    }

    #[test]
    fn unset_number_falls_back_to_default() {
        assert_eq!(
            optional_number_env_var("ROSTER_TEST_UNSET_NUMBER", 42_usize).unwrap(),
            42
        );
        assert_eq!(optional_env_var("ROSTER_TEST_UNSET_TEXT").unwrap(), None);
    }

    #[test]
    fn number_is_trimmed_before_parsing() {
        set_env("ROSTER_TEST_PADDED_NUMBER", " 2048 ");
        assert_eq!(
            optional_number_env_var("ROSTER_TEST_PADDED_NUMBER", 1_usize).unwrap(),
            2048
        );
    }

    #[test]
    fn malformed_number_is_a_parse_error() {
        set_env("ROSTER_TEST_MALFORMED_NUMBER", "12abc");

        let err = optional_number_env_var("ROSTER_TEST_MALFORMED_NUMBER", 30_u64).unwrap_err();
        assert!(matches!(
            err,
            RosterError::ParseEnvVar {
                name: "ROSTER_TEST_MALFORMED_NUMBER",
                ..
            }
        ));
        assert_eq!(err.client_message(), "Server misconfigured");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(non_blank_secret(None).is_none());
        assert!(non_blank_secret(Some(String::new())).is_none());
        assert!(non_blank_secret(Some("   ".to_string())).is_none());

        let key = non_blank_secret(Some("sk-test".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "sk-test");
    }

    #[test]
    fn completions_url_ignores_trailing_slash() {
        let config = ChatConfig {
            api_key: None,
            base_url: "http://localhost:11434/v1/".to_string(),
            model: "llama3".to_string(),
            timeout: Duration::from_secs(1),
        };

        assert_eq!(
            config.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
