//! Headless form element
//!
//! Holds everything the page would show for one form: field values and
//! error flags, length counters, the submit control and a single outcome
//! message. User actions enter through [`FormHandle::input`],
//! [`FormHandle::blur`] and [`FormHandle::submit`], which notify the
//! registered [`FormListener`]s.

use crate::{ClientError, Result};
use async_trait::async_trait;
use intake_forms::{CounterReading, FormField, FormSchema, IntakeSubmission};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Live state of one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldState {
    /// Name, value and constraints
    pub field: FormField,
    /// Value restored by a reset
    pub default_value: String,
    /// Disabled fields are neither validated nor submitted
    pub disabled: bool,
    /// Field is flagged as failing validation
    pub error: bool,
    /// Remaining-character reading, for length-limited fields
    pub counter: Option<CounterReading>,
}

/// Submit button state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    /// Button cannot be pressed
    pub disabled: bool,
    /// Loading indicator shown
    pub loading: bool,
}

/// Outcome message kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Submission accepted
    Success,
    /// Validation, network or server failure
    Error,
}

/// The message currently shown above the form
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Increases with every message shown on this form
    pub id: u64,
    /// Kind
    pub kind: MessageKind,
    /// Text
    pub text: String,
}

/// Submit event passed to listeners
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: AtomicBool,
}

impl SubmitEvent {
    /// Suppress the navigation-based submission
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Whether a listener suppressed the default action
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// Receives the user actions of a form
#[async_trait]
pub trait FormListener: Send + Sync {
    /// A field's value changed
    fn on_input(&self, _form: &Arc<FormHandle>, _name: &str) {}

    /// A field lost focus
    fn on_blur(&self, _form: &Arc<FormHandle>, _name: &str) {}

    /// The form's submit action fired
    async fn on_submit(&self, _form: &Arc<FormHandle>, _event: &SubmitEvent) {}
}

type Listeners = RwLock<Vec<(u64, Arc<dyn FormListener>)>>;

/// Detaches a listener registered with [`FormHandle::subscribe`]
#[must_use = "dropping a Disposer leaves the listener attached"]
pub struct Disposer {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Disposer {
    /// Remove the listener; a no-op once the form is gone
    pub fn dispose(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.write().retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Debug, Default)]
struct FormState {
    fields: Vec<FieldState>,
    submit: SubmitControl,
    message: Option<StatusMessage>,
    next_message_id: u64,
    navigation: Option<String>,
    native_submissions: u32,
}

impl FormState {
    fn field_mut(&mut self, name: &str) -> Result<&mut FieldState> {
        self.fields
            .iter_mut()
            .find(|f| f.field.name == name)
            .ok_or_else(|| ClientError::UnknownField(name.to_string()))
    }
}

/// One form instance
pub struct FormHandle {
    id: String,
    state: RwLock<FormState>,
    listeners: Arc<Listeners>,
    next_listener: AtomicU64,
}

impl FormHandle {
    /// Create a form with every field at its default value
    pub fn new(schema: FormSchema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|spec| FieldState {
                field: spec.to_field(),
                default_value: spec.default_value.clone(),
                disabled: false,
                error: false,
                counter: None,
            })
            .collect();

        Self {
            id: schema.id().to_string(),
            state: RwLock::new(FormState {
                fields,
                ..Default::default()
            }),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Form identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Snapshot of one field
    pub fn field(&self, name: &str) -> Option<FieldState> {
        self.state.read().fields.iter().find(|f| f.field.name == name).cloned()
    }

    /// Snapshot of every field in document order
    pub fn fields(&self) -> Vec<FieldState> {
        self.state.read().fields.clone()
    }

    /// Current value of one field
    pub fn value(&self, name: &str) -> Option<String> {
        self.field(name).map(|f| f.field.value)
    }

    /// Set a value without notifying listeners
    pub fn set_value(&self, name: &str, value: impl Into<String>) -> Result<()> {
        self.state.write().field_mut(name)?.field.value = value.into();
        Ok(())
    }

    /// Enable or disable a field
    pub fn set_disabled(&self, name: &str, disabled: bool) -> Result<()> {
        self.state.write().field_mut(name)?.disabled = disabled;
        Ok(())
    }

    /// Flag or unflag a field as invalid
    pub fn set_field_error(&self, name: &str, error: bool) -> Result<()> {
        self.state.write().field_mut(name)?.error = error;
        Ok(())
    }

    /// Update a field's counter reading
    pub fn set_counter(&self, name: &str, counter: Option<CounterReading>) -> Result<()> {
        self.state.write().field_mut(name)?.counter = counter;
        Ok(())
    }

    /// Fields that take part in validation and submission
    pub fn enabled_fields(&self) -> Vec<FormField> {
        self.state
            .read()
            .fields
            .iter()
            .filter(|f| !f.disabled)
            .map(|f| f.field.clone())
            .collect()
    }

    /// Flat payload of every named, enabled field
    pub fn serialize(&self) -> IntakeSubmission {
        self.enabled_fields()
            .into_iter()
            .map(|f| (f.name, f.value))
            .collect()
    }

    /// Restore default values and clear error flags
    pub fn reset(&self) {
        let mut state = self.state.write();
        for f in state.fields.iter_mut() {
            f.field.value = f.default_value.clone();
            f.error = false;
        }
    }

    // =========================================================================
    // Submit control
    // =========================================================================

    /// Submit button state
    pub fn submit_control(&self) -> SubmitControl {
        self.state.read().submit
    }

    /// Disable the button and show the loading indicator.
    ///
    /// Returns false when the button was already disabled.
    pub fn try_begin_submit(&self) -> bool {
        let mut state = self.state.write();
        if state.submit.disabled {
            return false;
        }
        state.submit = SubmitControl {
            disabled: true,
            loading: true,
        };
        true
    }

    /// Re-enable the button
    pub fn end_submit(&self) {
        self.state.write().submit = SubmitControl::default();
    }

    // =========================================================================
    // Messages and navigation
    // =========================================================================

    /// Replace any shown message; returns the new message id
    pub fn show_message(&self, kind: MessageKind, text: impl Into<String>) -> u64 {
        let mut state = self.state.write();
        state.next_message_id += 1;
        let id = state.next_message_id;
        state.message = Some(StatusMessage {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    /// Remove message `id` if it is still the one shown
    pub fn dismiss_message(&self, id: u64) -> bool {
        let mut state = self.state.write();
        if state.message.as_ref().map(|m| m.id) == Some(id) {
            state.message = None;
            true
        } else {
            false
        }
    }

    /// Message currently shown
    pub fn message(&self) -> Option<StatusMessage> {
        self.state.read().message.clone()
    }

    /// Leave the page for `url`
    pub fn navigate(&self, url: impl Into<String>) {
        let url = url.into();
        debug!("Form {} navigating to {}", self.id, url);
        self.state.write().navigation = Some(url);
    }

    /// Page the form navigated to, if any
    pub fn navigation(&self) -> Option<String> {
        self.state.read().navigation.clone()
    }

    /// Times the submit action fell through to a navigation-based submission
    pub fn native_submissions(&self) -> u32 {
        self.state.read().native_submissions
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener
    pub fn subscribe(&self, listener: Arc<dyn FormListener>) -> Disposer {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.write().push((id, listener));
        Disposer {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn snapshot_listeners(&self) -> Vec<Arc<dyn FormListener>> {
        self.listeners.read().iter().map(|(_, l)| l.clone()).collect()
    }

    /// User typed into a field
    pub fn input(self: &Arc<Self>, name: &str, value: impl Into<String>) -> Result<()> {
        self.set_value(name, value)?;
        for listener in self.snapshot_listeners() {
            listener.on_input(self, name);
        }
        Ok(())
    }

    /// A field lost focus
    pub fn blur(self: &Arc<Self>, name: &str) -> Result<()> {
        if self.field(name).is_none() {
            return Err(ClientError::UnknownField(name.to_string()));
        }
        for listener in self.snapshot_listeners() {
            listener.on_blur(self, name);
        }
        Ok(())
    }

    /// Fire the submit action.
    ///
    /// If no listener prevents the default, the submission falls through to a
    /// navigation-based post, counted by [`FormHandle::native_submissions`].
    pub async fn submit(self: &Arc<Self>) {
        let event = SubmitEvent::default();
        for listener in self.snapshot_listeners() {
            listener.on_submit(self, &event).await;
        }
        if !event.default_prevented() {
            self.state.write().native_submissions += 1;
        }
    }
}
