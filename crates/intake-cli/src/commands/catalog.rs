use crate::config::Settings;
use crate::output::OutputFormat;
use anyhow::Result;
use intake_client::HttpTransport;

pub async fn products(settings: &Settings, format: OutputFormat) -> Result<()> {
    let transport = HttpTransport::new(&settings.client)?;
    let catalog = transport.products().await?;
    format.print(&catalog)
}
