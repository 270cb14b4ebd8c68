//! Contact management operations.

use serde::Serialize;

use crate::error::{MetiganError, MetiganResult};
use crate::http::ApiRequest;
use crate::sanitize::{is_valid_email, sanitize_email};
use crate::types::{
    Ack, BulkImportResult, Contact, CreateContactRequest, Page, PageQuery, UpdateContactRequest,
};

use super::ServiceContext;

const CONTACTS_PATH: &str = "/api/contacts";

/// Service for managing contacts.
pub struct ContactService {
    ctx: ServiceContext,
}

impl ContactService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a contact.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the email address is malformed or
    /// the audience id is empty.
    pub async fn create(&self, mut request: CreateContactRequest) -> MetiganResult<Contact> {
        request.email = sanitize_email(&request.email);
        if !is_valid_email(&request.email) {
            return Err(MetiganError::validation_field(
                format!("Invalid email address: {}", request.email),
                "email",
            ));
        }
        if request.audience_id.trim().is_empty() {
            return Err(MetiganError::validation_field(
                "Audience id is required",
                "audienceId",
            ));
        }

        let api_request = ApiRequest::post(CONTACTS_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch a contact by id.
    pub async fn get(&self, id: &str) -> MetiganResult<Contact> {
        let api_request = ApiRequest::get(format!("{}/{}", CONTACTS_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Update a contact. `None` fields are left untouched.
    pub async fn update(
        &self,
        id: &str,
        mut request: UpdateContactRequest,
    ) -> MetiganResult<Contact> {
        if let Some(email) = request.email.take() {
            let email = sanitize_email(&email);
            if !is_valid_email(&email) {
                return Err(MetiganError::validation_field(
                    format!("Invalid email address: {}", email),
                    "email",
                ));
            }
            request.email = Some(email);
        }

        let api_request = ApiRequest::put(format!("{}/{}", CONTACTS_PATH, id)).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Delete a contact.
    pub async fn delete(&self, id: &str) -> MetiganResult<Ack> {
        let api_request = ApiRequest::delete(format!("{}/{}", CONTACTS_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// List contacts, paginated.
    pub async fn list(&self, page: PageQuery) -> MetiganResult<Page<Contact>> {
        let api_request = ApiRequest::get(CONTACTS_PATH)
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Search contacts by free-text query.
    pub async fn search(&self, query: &str, page: PageQuery) -> MetiganResult<Page<Contact>> {
        let api_request = ApiRequest::get(format!("{}/search", CONTACTS_PATH))
            .query("q", query)
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Attach tags to a contact.
    pub async fn add_tags(&self, id: &str, tags: &[String]) -> MetiganResult<Contact> {
        #[derive(Serialize)]
        struct TagsBody<'a> {
            tags: &'a [String],
        }

        if tags.is_empty() {
            return Err(MetiganError::validation_field(
                "At least one tag is required",
                "tags",
            ));
        }

        let api_request = ApiRequest::post(format!("{}/{}/tags", CONTACTS_PATH, id))
            .json(&TagsBody { tags })?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Import many contacts into an audience at once.
    ///
    /// Rows with invalid addresses are rejected client-side before
    /// anything is sent.
    pub async fn bulk_import(
        &self,
        audience_id: &str,
        mut contacts: Vec<CreateContactRequest>,
    ) -> MetiganResult<BulkImportResult> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ImportBody<'a> {
            audience_id: &'a str,
            contacts: Vec<CreateContactRequest>,
        }

        if audience_id.trim().is_empty() {
            return Err(MetiganError::validation_field(
                "Audience id is required",
                "audienceId",
            ));
        }
        if contacts.is_empty() {
            return Err(MetiganError::validation_field(
                "At least one contact is required",
                "contacts",
            ));
        }

        for contact in &mut contacts {
            contact.email = sanitize_email(&contact.email);
            if !is_valid_email(&contact.email) {
                return Err(MetiganError::validation_field(
                    format!("Invalid email address: {}", contact.email),
                    "email",
                ));
            }
        }

        let api_request = ApiRequest::post(format!("{}/import", CONTACTS_PATH)).json(&ImportBody {
            audience_id,
            contacts,
        })?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }
}
