//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;

/// msgrelay gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "msgrelay-gateway")]
#[command(about = "HTTP/JSON gateway and websocket event stream for msgrelay")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:4000")]
    pub listen: String,

    /// Path to the message data file.
    #[arg(short, long, default_value = "./data/messages.json")]
    pub data: PathBuf,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Path to the message data file.
    pub data_path: PathBuf,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_path: args.data.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4000".to_string(),
            data_path: PathBuf::from("./data/messages.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_args() {
        let args = Args {
            listen: "127.0.0.1:8080".to_string(),
            data: PathBuf::from("/tmp/messages.json"),
        };
        let config = GatewayConfig::from(&args);

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.data_path, PathBuf::from("/tmp/messages.json"));
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:4000");
        assert_eq!(config.data_path, PathBuf::from("./data/messages.json"));
    }
}
