//! CLI settings

use anyhow::{Context, Result};
use intake_client::ClientConfig;
use intake_forms::FormSchema;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a command needs to open the form
pub struct Settings {
    pub client: ClientConfig,
    pub schema: FormSchema,
    pub state_file: PathBuf,
}

impl Settings {
    pub fn resolve(
        config: Option<&Path>,
        server: Option<String>,
        schema: Option<&Path>,
        state_file: Option<PathBuf>,
    ) -> Result<Self> {
        let mut client = match config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(server) = server {
            client.server_url = server;
        }

        let schema = match schema {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("reading schema {}", path.display()))?;
                FormSchema::from_json(&content)?
            }
            None => FormSchema::intake(),
        };

        let state_file = match state_file {
            Some(path) => path,
            None => Self::default_state_file()?,
        };

        Ok(Self {
            client,
            schema,
            state_file,
        })
    }

    fn default_state_file() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .context("Cannot find a data directory")?;
        Ok(base.join("site-intake").join("session.json"))
    }
}
