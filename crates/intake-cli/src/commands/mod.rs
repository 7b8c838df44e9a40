//! Command implementations

mod catalog;
mod form;

pub use catalog::products;
pub use form::{clear, fill, show, submit, validate};

use crate::config::Settings;
use anyhow::Result;
use intake_client::{
    initialize, DraftStore, FileStorage, FormHandle, HttpTransport, IntakeBinding,
};
use std::sync::Arc;

/// A loaded form with its draft restored
pub(crate) struct Session {
    pub form: Arc<FormHandle>,
    pub drafts: DraftStore,
    pub binding: IntakeBinding,
}

impl Session {
    pub fn open(settings: &Settings) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(&settings.state_file));
        let drafts = DraftStore::new(storage, settings.client.draft_key.clone());
        let transport = Arc::new(HttpTransport::new(&settings.client)?);

        let form = Arc::new(FormHandle::new(settings.schema.clone()));
        let binding = initialize(&form, transport, drafts.clone(), settings.client.clone());
        Ok(Self {
            form,
            drafts,
            binding,
        })
    }
}

/// Parse `name=value`
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    if name.is_empty() {
        return Err("field name must not be empty".into());
    }
    Ok((name.to_string(), value.to_string()))
}
