//! Configuration for Signpost
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Signpost - store locator directory service
#[derive(Parser, Debug, Clone)]
#[command(name = "signpost")]
#[command(about = "Store locator directory service")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    ///
    /// The connection is established lazily by the first request that needs
    /// it and reused for the process lifetime.
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "signpost")]
    pub mongodb_db: String,

    /// CSV feed URL for the one-shot store import
    #[arg(
        long,
        env = "STORES_URI",
        default_value = "https://query.data.world/s/e7j36w22izsnudnygv6yytjp5so64a?dws=00000"
    )]
    pub stores_uri: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.mongodb_uri.starts_with("mongodb://") && !self.mongodb_uri.starts_with("mongodb+srv://") {
            return Err(format!(
                "MONGODB_URI must be a mongodb:// or mongodb+srv:// URI, got '{}'",
                self.mongodb_uri
            ));
        }

        if !self.stores_uri.starts_with("http://") && !self.stores_uri.starts_with("https://") {
            return Err(format!(
                "STORES_URI must be an http(s) URL, got '{}'",
                self.stores_uri
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args::parse_from(["signpost"])
    }

    #[test]
    fn test_defaults_validate() {
        assert!(args().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_mongo_uri() {
        let mut a = args();
        a.mongodb_uri = "postgres://localhost".to_string();
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_feed() {
        let mut a = args();
        a.stores_uri = "ftp://feed.example.com/stores.csv".to_string();
        assert!(a.validate().is_err());
    }
}
