use super::Session;
use crate::config::Settings;
use crate::output::OutputFormat;
use anyhow::{bail, Result};
use intake_client::{FieldState, SubmitOutcome};
use intake_forms::FieldValidator;

pub fn fill(settings: &Settings, name: &str, value: &str, format: OutputFormat) -> Result<()> {
    let session = Session::open(settings)?;
    session.form.input(name, value)?;
    session.form.blur(name)?;
    let field = session.form.field(name);
    format.print(&field)
}

pub fn show(settings: &Settings, format: OutputFormat) -> Result<()> {
    let session = Session::open(settings)?;
    let fields: Vec<FieldState> = session.form.fields();
    format.print(&fields)
}

pub fn validate(settings: &Settings, format: OutputFormat) -> Result<()> {
    let session = Session::open(settings)?;
    let result = FieldValidator::new().validate(&session.form.enabled_fields());
    format.print(&result)?;
    if !result.valid {
        bail!("{} field(s) failed validation", result.failed_fields().len());
    }
    Ok(())
}

pub async fn submit(
    settings: &Settings,
    fields: Vec<(String, String)>,
    format: OutputFormat,
) -> Result<()> {
    let session = Session::open(settings)?;
    for (name, value) in &fields {
        session.form.input(name, value.as_str())?;
    }

    let outcome = session.binding.controller.submit(&session.form).await;
    if let Some(message) = session.form.message() {
        format.print(&message)?;
    }

    match outcome {
        SubmitOutcome::Accepted => Ok(()),
        SubmitOutcome::Ignored => bail!("a submission is already in progress"),
        SubmitOutcome::Invalid(result) => {
            format.print(&result)?;
            bail!("{} field(s) failed validation", result.failed_fields().len())
        }
        SubmitOutcome::Failed(e) => bail!("submission failed, draft kept: {e}"),
    }
}

pub fn clear(settings: &Settings) -> Result<()> {
    let session = Session::open(settings)?;
    session.drafts.clear()?;
    println!("Draft {} cleared", session.drafts.key());
    Ok(())
}
