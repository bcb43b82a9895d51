//! Connection settings for an A-Parser instance

use url::Url;
use crate::error::{Result, SdkError};

/// Port A-Parser listens on out of the box
pub const DEFAULT_PORT: u16 = 9091;

const ENV_ADDRESS: &str = "APARSER_ADDRESS";
const ENV_PORT: &str = "APARSER_PORT";
const ENV_PASSWORD: &str = "APARSER_PASSWORD";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheme and host of the instance, e.g. `http://127.0.0.1`
    pub address: String,
    /// API port
    pub port: u16,
    /// API password, sent with every request
    pub password: String,
}

impl Config {
    /// Creates a configuration using [`DEFAULT_PORT`]
    ///
    /// ```rust
    /// use aparser_sdk::Config;
    ///
    /// let config = Config::new("http://127.0.0.1", "secret");
    /// assert_eq!(config.endpoint(), "http://127.0.0.1:9091/API");
    /// ```
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: DEFAULT_PORT,
            password: password.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Reads `APARSER_ADDRESS`, `APARSER_PASSWORD` and the optional `APARSER_PORT`
    pub fn from_env() -> Result<Self> {
        let address = std::env::var(ENV_ADDRESS)
            .map_err(|_| SdkError::InvalidConfig(format!("{} is not set", ENV_ADDRESS)))?;
        let password = std::env::var(ENV_PASSWORD)
            .map_err(|_| SdkError::InvalidConfig(format!("{} is not set", ENV_PASSWORD)))?;

        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                SdkError::InvalidConfig(format!("{} must be a port number, got '{}'", ENV_PORT, raw))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let config = Self { address, port, password };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the address is a bare `http`/`https` origin and the port is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.address)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::InvalidConfig(format!(
                "address must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.port().is_some() || has_explicit_port(&self.address) {
            return Err(SdkError::InvalidConfig(
                "address must not contain a port, use `port` instead".to_string(),
            ));
        }
        if url.path() != "/" || url.query().is_some() {
            return Err(SdkError::InvalidConfig(format!(
                "address must not contain a path or query: '{}'",
                self.address
            )));
        }
        if self.port == 0 {
            return Err(SdkError::InvalidConfig("port must not be 0".to_string()));
        }

        Ok(())
    }

    /// URL every API request is posted to
    pub fn endpoint(&self) -> String {
        format!("{}:{}/API", self.address.trim_end_matches('/'), self.port)
    }
}

/// `Url::port` hides ports equal to the scheme default, so look at the raw authority
fn has_explicit_port(address: &str) -> bool {
    let rest = address.split_once("://").map_or(address, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    match host.rsplit_once(']') {
        Some((_, after_ipv6)) => after_ipv6.contains(':'),
        None => host.contains(':'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let config = Config::new("http://localhost", "pass");
        assert_eq!(config.port, 9091);
        assert_eq!(config.endpoint(), "http://localhost:9091/API");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = Config::new("https://parser.example.com/", "pass").with_port(8080);
        assert_eq!(config.endpoint(), "https://parser.example.com:8080/API");
    }

    #[test]
    fn test_validate() {
        assert!(Config::new("http://127.0.0.1", "").validate().is_ok());
        assert!(Config::new("https://host/", "p").validate().is_ok());
        assert!(Config::new("http://[::1]", "p").validate().is_ok());

        assert!(matches!(
            Config::new("127.0.0.1", "p").validate(),
            Err(SdkError::UrlParse(_))
        ));
        assert!(matches!(
            Config::new("ftp://host", "p").validate(),
            Err(SdkError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new("http://host:9091", "p").validate(),
            Err(SdkError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new("http://host:80", "p").validate(),
            Err(SdkError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new("https://host:443/", "p").validate(),
            Err(SdkError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new("http://host/API", "p").validate(),
            Err(SdkError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new("http://host", "p").with_port(0).validate(),
            Err(SdkError::InvalidConfig(_))
        ));
    }
}
