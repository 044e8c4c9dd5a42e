use std::env;

use tracing::warn;

const DEFAULT_IP: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Server configuration for HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load server configuration from environment variables
    ///
    /// Environment variables:
    /// - SERVICE_IP: IP address to bind (default: "127.0.0.1")
    /// - SERVICE_PORT: Port to bind (default: 8080; unparsable values fall back)
    pub fn from_env() -> Self {
        let ip = env::var("SERVICE_IP").unwrap_or_else(|_| DEFAULT_IP.to_string());
        let port = env::var("SERVICE_PORT").ok();
        Self::from_values(ip, port.as_deref())
    }

    fn from_values(ip: String, port: Option<&str>) -> Self {
        let port = match port.map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("SERVICE_PORT={raw} is not a valid port, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
        };

        Self { ip, port }
    }

    /// Get the bind address as "ip:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_bind_address_from_ip_and_port() {
        // Arrange
        let config = ServerConfig {
            ip: "0.0.0.0".to_string(),
            port: 9000,
        };

        // Act
        let address = config.bind_address();

        // Assert
        assert_eq!(address, "0.0.0.0:9000");
    }

    #[test]
    fn should_use_default_port_when_value_is_not_a_number() {
        let config = ServerConfig::from_values(DEFAULT_IP.to_string(), Some("eighty"));

        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn should_parse_port_with_surrounding_spaces() {
        let config = ServerConfig::from_values(DEFAULT_IP.to_string(), Some(" 8443 "));

        assert_eq!(config.bind_address(), "127.0.0.1:8443");
    }
}
