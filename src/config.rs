//! Configuration types for the client.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// IRC server and identity settings.
    pub server: ServerConfig,
    /// Speech synthesis settings.
    pub speech: SpeechOptions,
}

/// IRC server and identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Hostname to connect to.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Channel to join on connect.
    pub channel: String,
    /// Nickname to appear as.
    pub nick: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 6667,
            channel: String::new(),
            nick: String::new(),
        }
    }
}

/// Speech synthesis configuration.
///
/// Rate and volume are passed to the platform synthesizer verbatim when it
/// supports them; valid ranges are platform-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechOptions {
    /// Whether channel activity is spoken at all.
    pub enabled: bool,
    /// Speaking rate (None = platform default).
    pub rate: Option<f32>,
    /// Speaking volume (None = platform default).
    pub volume: Option<f32>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: None,
            volume: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Check that the fields required to start a session are present.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ClientError::Config("server host is required".to_owned()));
        }
        if self.server.channel.trim().is_empty() {
            return Err(ClientError::Config("channel is required".to_owned()));
        }
        if self.server.nick.trim().is_empty() {
            return Err(ClientError::Config("nickname is required".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_port_is_6667() {
        let config = ClientConfig::default();
        assert_eq!(config.server.port, 6667);
        assert!(config.speech.enabled);
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
[server]
host = "irc.example.net"
channel = "#talk"
nick = "crier"

[speech]
rate = 1.2
"##,
        )
        .unwrap();

        let loaded = ClientConfig::from_file(&path).expect("load");
        assert_eq!(loaded.server.host, "irc.example.net");
        assert_eq!(loaded.server.port, 6667);
        assert_eq!(loaded.server.channel, "#talk");
        assert_eq!(loaded.speech.rate, Some(1.2));
        assert_eq!(loaded.speech.volume, None);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = ClientConfig::from_file(std::path::Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_requires_host_channel_and_nick() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_err());

        config.server.host = "irc.example.net".to_owned();
        assert!(config.validate().is_err());

        config.server.channel = "#talk".to_owned();
        assert!(config.validate().is_err());

        config.server.nick = "crier".to_owned();
        assert!(config.validate().is_ok());
    }
}
