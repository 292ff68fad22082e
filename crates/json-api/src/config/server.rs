//! Server Config

use clap::Args;

/// Listener settings for the storefront API.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Interface to bind
    #[arg(short = 'H', long, env = "STOREFRONT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "STOREFRONT_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServerRuntimeConfig {
    /// `host:port`, bracketing IPv6 literals.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            return format!("[{}]:{}", self.host, self.port);
        }

        format!("{}:{}", self.host, self.port)
    }
}
