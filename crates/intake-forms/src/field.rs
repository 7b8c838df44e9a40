//! Form fields and schema

use crate::{FormsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input kind of a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text (also used for textarea and select)
    #[default]
    Text,
    /// `local-part@domain.tld`
    Email,
    /// Absolute URL
    Url,
}

/// Declared constraints of one field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Value must be non-blank
    #[serde(default)]
    pub required: bool,
    /// Shape check applied to non-blank values
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    /// Upper bound on the value length, in characters
    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// A named field and its current value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Identifier, unique within a form
    pub name: String,
    /// Current value, never coerced
    pub value: String,
    /// Constraints checked by the validator
    pub constraints: FieldConstraints,
}

impl FormField {
    /// Create a field with the given value
    pub fn new(name: impl Into<String>, value: impl Into<String>, constraints: FieldConstraints) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            constraints,
        }
    }

    /// Length of the value in characters
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// True when the value is empty after trimming whitespace
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Declaration of one field in a [`FormSchema`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Constraints
    #[serde(flatten)]
    pub constraints: FieldConstraints,
    /// Value the field shows when the form loads or is reset
    #[serde(default, rename = "default", skip_serializing_if = "String::is_empty")]
    pub default_value: String,
}

impl FieldSpec {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            constraints: FieldConstraints {
                kind,
                ..Default::default()
            },
            default_value: String::new(),
        }
    }

    /// Plain text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    /// Email field
    pub fn email(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Email)
    }

    /// URL field
    pub fn url(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Url)
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    /// Limit the value length
    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.max_length = Some(max);
        self
    }

    /// Set the default value
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Instantiate the field at its default value
    pub fn to_field(&self) -> FormField {
        FormField::new(&self.name, &self.default_value, self.constraints.clone())
    }
}

/// Ordered set of uniquely named fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    id: String,
    fields: Vec<FieldSpec>,
}

#[derive(Deserialize)]
struct RawSchema {
    id: String,
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Build a schema, rejecting empty or duplicate names
    pub fn new(id: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &fields {
            if spec.name.is_empty() {
                return Err(FormsError::EmptyFieldName);
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(FormsError::DuplicateField(spec.name.clone()));
            }
        }
        Ok(Self { id: id.into(), fields })
    }

    /// Parse a schema from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSchema = serde_json::from_str(json)?;
        Self::new(raw.id, raw.fields)
    }

    /// The site's intake form
    pub fn intake() -> Self {
        Self {
            id: "intake-form".into(),
            fields: vec![
                FieldSpec::text("name").required(),
                FieldSpec::email("email").required(),
                FieldSpec::text("company"),
                FieldSpec::url("website"),
                FieldSpec::text("phone"),
                FieldSpec::text("message").max_length(1000),
            ],
        }
    }

    /// Form identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Field declarations in document order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field declaration
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
