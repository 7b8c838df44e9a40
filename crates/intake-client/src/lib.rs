//! Intake Client - browser-side half of the intake pipeline
//!
//! Models one intake form instance without a DOM: field values, the
//! submit control, the outcome message slot and per-field error flags live
//! in a [`FormHandle`]. Behaviour is attached with [`initialize`], which
//! restores the saved draft and registers an [`IntakeController`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        FormHandle                            │
//! │   fields · submit control · message slot · listeners         │
//! └──────────┬──────────────────────┬────────────────────────────┘
//!       input/blur               submit
//!            │                      │
//! ┌──────────▼──────────────────────▼────────────────────────────┐
//! │                     IntakeController                         │
//! │  FieldValidator ── DraftStore ── IntakeTransport (HTTP)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation of an in-flight submission is not supported; the submit
//! control stays disabled until the transport returns.

#![warn(missing_docs)]

pub mod config;
pub mod draft;
pub mod form;
pub mod storage;
pub mod submit;
pub mod transport;

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub use config::{ClientConfig, Confirmation, Messages};
pub use draft::DraftStore;
pub use form::{Disposer, FieldState, FormHandle, FormListener, MessageKind, StatusMessage, SubmitControl, SubmitEvent};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use submit::{IntakeController, SubmitOutcome, SubmitPhase};
pub use transport::{HttpTransport, IntakeTransport};

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request did not complete or the response was unreadable
    #[error("network error: {0}")]
    Network(String),
    /// Endpoint answered with a non-success status
    #[error("submission rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },
    /// Session storage could not be read or written
    #[error("storage error: {0}")]
    Storage(String),
    /// Client configuration is unusable
    #[error("config error: {0}")]
    Config(String),
    /// Field name the form does not declare
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Result type for the intake client
pub type Result<T> = std::result::Result<T, ClientError>;

/// Handlers attached to one form by [`initialize`]
pub struct IntakeBinding {
    /// Controller driving validation and submission
    pub controller: Arc<IntakeController>,
    /// Detaches the controller from the form
    pub disposer: Disposer,
}

/// Composition root for one form instance.
///
/// Repopulates fields from the saved draft (fields without a draft entry keep
/// their defaults), refreshes length counters, and registers the controller
/// as the form's listener.
pub fn initialize(
    form: &Arc<FormHandle>,
    transport: Arc<dyn IntakeTransport>,
    drafts: DraftStore,
    config: ClientConfig,
) -> IntakeBinding {
    let saved = drafts.load_all();
    let mut restored = 0;
    for (name, value) in saved {
        match form.set_value(&name, value) {
            Ok(()) => restored += 1,
            Err(_) => debug!("Ignoring draft entry for unknown field {}", name),
        }
    }
    if restored > 0 {
        info!("Restored {} field(s) of form {} from draft", restored, form.id());
    }

    let controller = Arc::new(IntakeController::new(transport, drafts, config));
    controller.refresh_counters(form);

    let disposer = form.subscribe(controller.clone());
    IntakeBinding { controller, disposer }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_forms::{FormSchema, IntakeAck, IntakeSubmission};

    struct NeverCalled;

    #[async_trait::async_trait]
    impl IntakeTransport for NeverCalled {
        async fn send(&self, _submission: &IntakeSubmission) -> Result<IntakeAck> {
            panic!("transport must not be called");
        }
    }

    #[test]
    fn test_initialize_restores_matching_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let drafts = DraftStore::new(storage, "intakeFormData");
        drafts.save("name", "Jane").unwrap();
        drafts.save("retired_field", "ignored").unwrap();

        let form = Arc::new(FormHandle::new(FormSchema::intake()));
        let binding = initialize(&form, Arc::new(NeverCalled), drafts, ClientConfig::default());

        assert_eq!(form.value("name").as_deref(), Some("Jane"));
        assert_eq!(form.value("email").as_deref(), Some(""));
        assert_eq!(form.listener_count(), 1);

        binding.disposer.dispose();
        assert_eq!(form.listener_count(), 0);
    }

    #[test]
    fn test_initialize_sets_counters() {
        let form = Arc::new(FormHandle::new(FormSchema::intake()));
        let drafts = DraftStore::new(Arc::new(MemoryStorage::new()), "k");
        let _binding = initialize(&form, Arc::new(NeverCalled), drafts, ClientConfig::default());

        let reading = form.field("message").unwrap().counter.unwrap();
        assert_eq!(reading.remaining, 1000);
        assert!(form.field("name").unwrap().counter.is_none());
    }
}
