//! Form hosting and submission types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of input rendered for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormFieldType {
    /// Single-line text input.
    Text,
    /// Email address input.
    Email,
    /// Numeric input.
    Number,
    /// Multi-line text area.
    Textarea,
    /// Checkbox.
    Checkbox,
    /// Dropdown with predefined options.
    Select,
}

/// One field of a hosted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Field name used as the submission key.
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    /// Input kind.
    #[serde(rename = "type")]
    pub field_type: FormFieldType,
    /// Whether a value is required to submit.
    #[serde(default)]
    pub required: bool,
    /// Options for [`FormFieldType::Select`] fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormField {
    /// A required email field named `email`, present on most signup forms.
    pub fn email() -> Self {
        Self {
            name: "email".to_string(),
            label: "Email".to_string(),
            field_type: FormFieldType::Email,
            required: true,
            options: Vec::new(),
        }
    }

    /// A plain text field.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type: FormFieldType::Text,
            required: false,
            options: Vec::new(),
        }
    }
}

/// A hosted signup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Form id.
    pub id: String,
    /// Form title.
    pub title: String,
    /// URL slug for the public endpoint.
    pub slug: String,
    /// Fields in display order.
    pub fields: Vec<FormField>,
    /// Audience that submissions feed into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<String>,
    /// Whether the form is live.
    #[serde(default)]
    pub published: bool,
}

/// Payload for creating a form. At least one field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    /// Form title.
    pub title: String,
    /// Fields in display order.
    pub fields: Vec<FormField>,
    /// Audience that submissions feed into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<String>,
}

/// Partial update for an existing form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormRequest {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement field list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    /// New target audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<String>,
}

/// One submission received through the public form endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    /// Submission id.
    pub id: String,
    /// Submitted values keyed by field name.
    pub values: HashMap<String, serde_json::Value>,
    /// ISO 8601 timestamp assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}
