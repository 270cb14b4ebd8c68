//! Contact management types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contact stored in an audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Audience the contact belongs to.
    pub audience_id: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Subscription status (`subscribed`, `unsubscribed`, `bounced`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Tags attached to the contact.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Free-form custom fields.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_fields: HashMap<String, serde_json::Value>,
}

/// Payload for creating a contact. Email and audience id are required;
/// everything else is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    /// Email address.
    pub email: String,
    /// Target audience id.
    pub audience_id: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Initial tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Free-form custom fields.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_fields: HashMap<String, serde_json::Value>,
}

/// Partial update for an existing contact; `None` fields are untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Replacement tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Custom fields to merge in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, serde_json::Value>>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    /// Contacts created.
    pub imported: u64,
    /// Rows skipped (duplicates or invalid addresses).
    pub skipped: u64,
    /// Per-row error messages, when any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_deserializes_sparse_payload() {
        let contact: Contact = serde_json::from_str(
            r#"{"id":"c_1","email":"a@b.co","audienceId":"aud_1"}"#,
        )
        .unwrap();
        assert_eq!(contact.id, "c_1");
        assert!(contact.tags.is_empty());
        assert!(contact.status.is_none());
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let update = UpdateContactRequest {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("email").is_none());
        assert!(json.get("tags").is_none());
    }
}
