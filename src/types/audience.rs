//! Audience management types.

use serde::{Deserialize, Serialize};

/// A named list of contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    /// Audience id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of contacts in the audience.
    #[serde(default)]
    pub contact_count: u64,
}

/// Payload for creating an audience. The name must be at least two
/// characters long.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAudienceRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for an existing audience.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAudienceRequest {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Delivery statistics for an audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceStats {
    /// Total contacts.
    pub total_contacts: u64,
    /// Currently subscribed contacts.
    pub subscribed: u64,
    /// Unsubscribed contacts.
    pub unsubscribed: u64,
    /// Hard-bounced contacts.
    pub bounced: u64,
}

/// Result of cleaning an audience of inactive contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResult {
    /// Contacts removed.
    pub removed: u64,
}
