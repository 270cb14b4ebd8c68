//! Request and response types for the Metigan API.

pub mod attachment;
pub mod audience;
pub mod contact;
pub mod email;
pub mod form;
pub mod template;

pub use attachment::{Attachment, AttachmentContent, AttachmentEncoding};
pub use audience::{
    Audience, AudienceStats, CleanResult, CreateAudienceRequest, UpdateAudienceRequest,
};
pub use contact::{BulkImportResult, Contact, CreateContactRequest, UpdateContactRequest};
pub use email::{
    SendEmailRequest, SendEmailResponse, SendOtpRequest, SendTransactionalRequest,
};
pub use form::{
    CreateFormRequest, Form, FormField, FormFieldType, FormSubmission, UpdateFormRequest,
};
pub use template::{CreateTemplateRequest, Template, UpdateTemplateRequest};

use serde::{Deserialize, Serialize};

/// A page of results from a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Total items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

/// Pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// Generic acknowledgement returned by delete-style endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    /// Whether the operation was applied.
    pub success: bool,
    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
