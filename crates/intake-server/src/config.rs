//! Server configuration

use clap::Parser;
use std::path::PathBuf;

/// Command line / environment configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "intake-server")]
#[command(version)]
#[command(about = "Serves the site, its product catalog and the intake endpoint", long_about = None)]
pub struct ServerConfig {
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "INTAKE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding `products.json` and `intakes.json`
    #[arg(long, env = "INTAKE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory of built site assets
    #[arg(long, env = "INTAKE_STATIC_DIR", default_value = "dist")]
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Catalog file
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join("products.json")
    }

    /// Record log file
    pub fn intake_log_path(&self) -> PathBuf {
        self.data_dir.join("intakes.json")
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
