//! Submission controller
//!
//! Phases of one submit attempt:
//!
//! ```text
//! Idle ─► Validating ─┬─► Invalid ──────────────► Idle
//!                     └─► Submitting ─┬─► Success ─► Idle
//!                                     └─► Failed ──► Idle
//! ```
//!
//! The disabled submit control is the only concurrency guard: a submit
//! action that finds it disabled does nothing. No retry is attempted.

use crate::config::ClientConfig;
use crate::draft::DraftStore;
use crate::form::{FormHandle, FormListener, MessageKind, SubmitEvent};
use crate::transport::IntakeTransport;
use crate::ClientError;
use async_trait::async_trait;
use intake_forms::{CharCounter, FieldValidator, ValidationResult};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the controller is in a submit attempt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    /// Waiting for the user
    #[default]
    Idle,
    /// Running the submit-time validation
    Validating,
    /// Validation failed
    Invalid,
    /// Request in flight
    Submitting,
    /// Endpoint acknowledged
    Success,
    /// Network or server failure
    Failed,
}

/// Result of one submit action
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Submit control was disabled; nothing happened
    Ignored,
    /// Fields failed validation; no request was made
    Invalid(ValidationResult),
    /// Endpoint acknowledged the submission
    Accepted,
    /// Request failed; fields and draft are untouched
    Failed(ClientError),
}

/// Validation, draft and submission behaviour of one form
pub struct IntakeController {
    transport: Arc<dyn IntakeTransport>,
    drafts: DraftStore,
    config: ClientConfig,
    validator: FieldValidator,
    counter: CharCounter,
    phase: RwLock<SubmitPhase>,
}

impl IntakeController {
    /// Create a controller
    pub fn new(transport: Arc<dyn IntakeTransport>, drafts: DraftStore, config: ClientConfig) -> Self {
        let counter = CharCounter {
            warn_below: config.counter_warn_below,
        };
        Self {
            transport,
            drafts,
            config,
            validator: FieldValidator::new(),
            counter,
            phase: RwLock::new(SubmitPhase::Idle),
        }
    }

    /// Current phase
    pub fn phase(&self) -> SubmitPhase {
        *self.phase.read()
    }

    fn enter(&self, phase: SubmitPhase) {
        debug!("Submit phase -> {:?}", phase);
        *self.phase.write() = phase;
    }

    /// Recompute the counter of every length-limited field
    pub fn refresh_counters(&self, form: &FormHandle) {
        for state in form.fields() {
            self.refresh_counter(form, &state.field.name);
        }
    }

    fn refresh_counter(&self, form: &FormHandle, name: &str) {
        let Some(state) = form.field(name) else { return };
        let reading = state
            .field
            .constraints
            .max_length
            .map(|max| self.counter.evaluate(max, &state.field.value));
        let _ = form.set_counter(name, reading);
    }

    fn show_for(&self, form: &Arc<FormHandle>, kind: MessageKind, text: &str) {
        let id = form.show_message(kind, text);
        let form = Arc::clone(form);
        let after = self.config.dismiss_after();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            form.dismiss_message(id);
        });
    }

    fn schedule_confirmation(&self, form: &Arc<FormHandle>) {
        let Some(confirmation) = self.config.confirmation.clone() else { return };
        let form = Arc::clone(form);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(confirmation.delay_ms)).await;
            form.navigate(confirmation.url);
        });
    }

    /// Run one submit attempt against `form`
    pub async fn submit(&self, form: &Arc<FormHandle>) -> SubmitOutcome {
        if form.submit_control().disabled {
            debug!("Submit ignored: request already in flight for {}", form.id());
            return SubmitOutcome::Ignored;
        }

        self.enter(SubmitPhase::Validating);
        let result = self.validator.validate(&form.enabled_fields());
        for state in form.fields() {
            let failed = result.failures.iter().any(|f| f.field == state.field.name);
            let _ = form.set_field_error(&state.field.name, failed);
        }
        if !result.valid {
            self.enter(SubmitPhase::Invalid);
            self.show_for(form, MessageKind::Error, &self.config.messages.invalid);
            self.enter(SubmitPhase::Idle);
            return SubmitOutcome::Invalid(result);
        }

        if !form.try_begin_submit() {
            self.enter(SubmitPhase::Idle);
            return SubmitOutcome::Ignored;
        }
        self.enter(SubmitPhase::Submitting);
        let payload = form.serialize();

        let outcome = match self.transport.send(&payload).await {
            Ok(_) => {
                self.enter(SubmitPhase::Success);
                info!("Form {} submitted", form.id());
                self.show_for(form, MessageKind::Success, &self.config.messages.success);
                form.reset();
                self.refresh_counters(form);
                if let Err(e) = self.drafts.clear() {
                    warn!("Could not clear draft {}: {}", self.drafts.key(), e);
                }
                self.schedule_confirmation(form);
                SubmitOutcome::Accepted
            }
            Err(e) => {
                self.enter(SubmitPhase::Failed);
                warn!("Form {} submission failed: {}", form.id(), e);
                self.show_for(form, MessageKind::Error, &self.config.messages.error);
                SubmitOutcome::Failed(e)
            }
        };

        form.end_submit();
        self.enter(SubmitPhase::Idle);
        outcome
    }
}

#[async_trait]
impl FormListener for IntakeController {
    fn on_input(&self, form: &Arc<FormHandle>, name: &str) {
        let _ = form.set_field_error(name, false);
        self.refresh_counter(form, name);
        if let Some(value) = form.value(name) {
            if let Err(e) = self.drafts.save(name, &value) {
                warn!("Could not save draft for {}: {}", name, e);
            }
        }
    }

    fn on_blur(&self, form: &Arc<FormHandle>, name: &str) {
        let Some(state) = form.field(name) else { return };
        if state.disabled {
            return;
        }
        let failed = !self.validator.check_field(&state.field).is_empty();
        let _ = form.set_field_error(name, failed);
    }

    async fn on_submit(&self, form: &Arc<FormHandle>, event: &SubmitEvent) {
        event.prevent_default();
        self.submit(form).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::{initialize, Confirmation, IntakeBinding};
    use intake_forms::{FailureReason, FormSchema, IntakeAck, IntakeSubmission};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Transport answering with a fixed outcome, optionally parked until released
    #[derive(Default)]
    struct FakeTransport {
        calls: AtomicUsize,
        sent: Mutex<Vec<IntakeSubmission>>,
        fail_with: Option<u16>,
        gate: Option<Arc<Notify>>,
        entered: Arc<Notify>,
    }

    #[async_trait]
    impl IntakeTransport for FakeTransport {
        async fn send(&self, submission: &IntakeSubmission) -> crate::Result<IntakeAck> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().push(submission.clone());
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.fail_with {
                Some(status) => Err(ClientError::Rejected { status }),
                None => Ok(IntakeAck::ok()),
            }
        }
    }

    struct Fixture {
        form: Arc<FormHandle>,
        drafts: DraftStore,
        transport: Arc<FakeTransport>,
        binding: IntakeBinding,
    }

    fn fixture(transport: FakeTransport, config: ClientConfig) -> Fixture {
        let storage = Arc::new(MemoryStorage::new());
        let drafts = DraftStore::new(storage, config.draft_key.clone());
        let form = Arc::new(FormHandle::new(FormSchema::intake()));
        let transport = Arc::new(transport);
        let binding = initialize(&form, transport.clone(), drafts.clone(), config);
        Fixture {
            form,
            drafts,
            transport,
            binding,
        }
    }

    fn fill_valid(form: &Arc<FormHandle>) {
        form.input("name", "Jane").unwrap();
        form.input("email", "jane@x.com").unwrap();
    }

    #[tokio::test]
    async fn test_empty_required_blocks_network() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fx.form.input("email", "jane@x.com").unwrap();

        let outcome = fx.binding.controller.submit(&fx.form).await;
        let SubmitOutcome::Invalid(result) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(result.reasons_for("name"), vec![FailureReason::Empty]);
        assert_eq!(fx.transport.calls.load(Ordering::SeqCst), 0);

        assert!(fx.form.field("name").unwrap().error);
        assert!(!fx.form.field("email").unwrap().error);
        let message = fx.form.message().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, ClientConfig::default().messages.invalid);
        assert_eq!(fx.binding.controller.phase(), SubmitPhase::Idle);
        assert_eq!(fx.drafts.load_all()["email"], "jane@x.com");
    }

    #[tokio::test]
    async fn test_success_clears_draft_and_resets() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fill_valid(&fx.form);
        fx.form.input("message", "Hello").unwrap();
        assert_eq!(fx.drafts.load_all().len(), 3);

        fx.form.submit().await;

        assert_eq!(fx.transport.calls.load(Ordering::SeqCst), 1);
        let sent = fx.transport.sent.lock()[0].clone();
        assert_eq!(sent.get("name"), Some("Jane"));
        assert_eq!(sent.get("email"), Some("jane@x.com"));
        assert_eq!(sent.get("website"), Some(""));

        assert!(fx.drafts.load_all().is_empty());
        assert_eq!(fx.form.value("name").as_deref(), Some(""));
        assert_eq!(fx.form.field("message").unwrap().counter.unwrap().remaining, 1000);
        assert_eq!(fx.form.submit_control(), crate::SubmitControl::default());
        assert_eq!(fx.form.native_submissions(), 0);

        let message = fx.form.message().unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(message.text, ClientConfig::default().messages.success);
    }

    #[tokio::test]
    async fn test_server_failure_keeps_draft() {
        let transport = FakeTransport {
            fail_with: Some(500),
            ..Default::default()
        };
        let fx = fixture(transport, ClientConfig::default());
        fill_valid(&fx.form);
        let before = fx.drafts.load_all();

        let outcome = fx.binding.controller.submit(&fx.form).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Rejected { status: 500 })));

        assert_eq!(fx.drafts.load_all(), before);
        assert_eq!(fx.form.value("name").as_deref(), Some("Jane"));
        assert_eq!(fx.form.message().unwrap().kind, MessageKind::Error);
        assert!(!fx.form.submit_control().disabled);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = FakeTransport {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let fx = fixture(transport, ClientConfig::default());
        fill_valid(&fx.form);

        let form = fx.form.clone();
        let first = tokio::spawn(async move { form.submit().await });
        fx.transport.entered.notified().await;

        assert_eq!(fx.binding.controller.phase(), SubmitPhase::Submitting);
        assert_eq!(
            fx.form.submit_control(),
            crate::SubmitControl { disabled: true, loading: true }
        );
        let second = fx.binding.controller.submit(&fx.form).await;
        assert!(matches!(second, SubmitOutcome::Ignored));

        gate.notify_one();
        first.await.unwrap();
        assert_eq!(fx.transport.calls.load(Ordering::SeqCst), 1);
        assert!(!fx.form.submit_control().disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_auto_dismiss() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fill_valid(&fx.form);
        fx.form.submit().await;
        assert!(fx.form.message().is_some());

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(fx.form.message().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(fx.form.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_survives_old_timer() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fx.form.submit().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        fill_valid(&fx.form);
        fx.form.submit().await;
        assert_eq!(fx.form.message().unwrap().kind, MessageKind::Success);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fx.form.message().unwrap().kind, MessageKind::Success);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(fx.form.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_navigation() {
        let config = ClientConfig {
            confirmation: Some(Confirmation {
                url: "confirmation.html".into(),
                delay_ms: 2_000,
            }),
            ..Default::default()
        };
        let fx = fixture(FakeTransport::default(), config);
        fill_valid(&fx.form);
        fx.form.submit().await;
        assert!(fx.form.navigation().is_none());

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(fx.form.navigation().as_deref(), Some("confirmation.html"));
    }

    #[tokio::test]
    async fn test_blur_and_input_toggle_error() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());

        fx.form.input("email", "jane").unwrap();
        fx.form.blur("email").unwrap();
        assert!(fx.form.field("email").unwrap().error);

        fx.form.input("email", "jane@").unwrap();
        assert!(!fx.form.field("email").unwrap().error);

        fx.form.input("email", "jane@x.com").unwrap();
        fx.form.blur("email").unwrap();
        assert!(!fx.form.field("email").unwrap().error);

        fx.form.blur("name").unwrap();
        assert!(fx.form.field("name").unwrap().error);
    }

    #[tokio::test]
    async fn test_counter_tracks_input() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fx.form.input("message", "x".repeat(960)).unwrap();

        let reading = fx.form.field("message").unwrap().counter.unwrap();
        assert_eq!(reading.remaining, 40);
        assert_eq!(reading.state, intake_forms::CounterState::Warning);
    }

    #[tokio::test]
    async fn test_disabled_fields_not_validated_or_sent() {
        let fx = fixture(FakeTransport::default(), ClientConfig::default());
        fill_valid(&fx.form);
        fx.form.input("website", "not a url").unwrap();
        fx.form.set_disabled("website", true).unwrap();

        let outcome = fx.binding.controller.submit(&fx.form).await;
        assert!(matches!(outcome, SubmitOutcome::Accepted));
        assert_eq!(fx.transport.sent.lock()[0].get("website"), None);
    }
}
