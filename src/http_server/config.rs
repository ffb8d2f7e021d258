//! HTTP Server Configuration
//!
//! The `http:` section of the service config.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Listener and CORS settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    /// IP literal to bind, v4 or v6 (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|e| format!("invalid host '{}': {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty()
    }
}
