use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".docsync.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level configuration loaded from .docsync.toml plus environment overrides.
///
/// Every field is optional. A missing documentation server URL only fails
/// the dispatch that needs it, never startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the documentation server lives and how to authenticate against it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocsConfig {
    /// Base URL; requests go to `{server_url}/api/generate`. Env: DOCS_SERVER_URL
    pub server_url: Option<String>,
    /// Sent as a bearer token when present. Env: DOCS_API_KEY
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Installation or personal access token. Env: GITHUB_TOKEN
    pub token: Option<String>,
    /// REST API root, overridable for GitHub Enterprise. Env: GITHUB_API_URL
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Env: HOST
    pub host: IpAddr,
    /// Env: PORT
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3002,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Load configuration from .docsync.toml in the current directory, then
    /// apply environment overrides. Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific path without touching the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(url) = var("DOCS_SERVER_URL") {
            self.docs.server_url = Some(url);
        }
        if let Some(key) = var("DOCS_API_KEY") {
            self.docs.api_key = Some(key);
        }
        if let Some(token) = var("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(api_url) = var("GITHUB_API_URL") {
            self.github.api_url = api_url;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                value: host.clone(),
            })?;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.docs.server_url.is_none());
        assert!(config.docs.api_key.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.server.port, 3002);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[docs]
server_url = "https://docs.internal"
api_key = "k-123"

[server]
port = 8080
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.docs.server_url.as_deref(), Some("https://docs.internal"));
        assert_eq!(config.docs.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.server.port, 8080);
        // untouched sections keep their defaults
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.server.host, IpAddr::from([0, 0, 0, 0]));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"ghp_file\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_file"));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[docs\nserver_url = ").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config = toml::from_str("[docs]\nserver_url = \"http://file\"").unwrap();
        config
            .apply_env(env_from(&[
                ("DOCS_SERVER_URL", "http://env"),
                ("DOCS_API_KEY", "secret"),
                ("PORT", "4000"),
            ]))
            .unwrap();
        assert_eq!(config.docs.server_url.as_deref(), Some("http://env"));
        assert_eq!(config.docs.api_key.as_deref(), Some("secret"));
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env_from(&[("DOCS_API_KEY", ""), ("GITHUB_TOKEN", "")]))
            .unwrap();
        assert!(config.docs.api_key.is_none());
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(env_from(&[("PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3002,
        };
        assert_eq!(server.socket_addr().to_string(), "127.0.0.1:3002");
    }
}
