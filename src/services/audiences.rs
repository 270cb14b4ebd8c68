//! Audience management operations.

use serde::Serialize;

use crate::error::{MetiganError, MetiganResult};
use crate::http::ApiRequest;
use crate::types::audience::CleanResult;
use crate::types::{
    Ack, Audience, AudienceStats, CreateAudienceRequest, Page, PageQuery, UpdateAudienceRequest,
};

use super::ServiceContext;

const AUDIENCES_PATH: &str = "/api/audiences";

/// Service for managing audiences.
pub struct AudienceService {
    ctx: ServiceContext,
}

impl AudienceService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an audience. Names shorter than two characters are
    /// rejected before any network call.
    pub async fn create(&self, mut request: CreateAudienceRequest) -> MetiganResult<Audience> {
        request.name = request.name.trim().to_string();
        if request.name.chars().count() < 2 {
            return Err(MetiganError::validation_field(
                "Audience name must be at least 2 characters",
                "name",
            ));
        }

        let api_request = ApiRequest::post(AUDIENCES_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch an audience by id.
    pub async fn get(&self, id: &str) -> MetiganResult<Audience> {
        let api_request = ApiRequest::get(format!("{}/{}", AUDIENCES_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Update an audience.
    pub async fn update(
        &self,
        id: &str,
        mut request: UpdateAudienceRequest,
    ) -> MetiganResult<Audience> {
        if let Some(name) = request.name.take() {
            let name = name.trim().to_string();
            if name.chars().count() < 2 {
                return Err(MetiganError::validation_field(
                    "Audience name must be at least 2 characters",
                    "name",
                ));
            }
            request.name = Some(name);
        }

        let api_request = ApiRequest::put(format!("{}/{}", AUDIENCES_PATH, id)).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Delete an audience.
    pub async fn delete(&self, id: &str) -> MetiganResult<Ack> {
        let api_request = ApiRequest::delete(format!("{}/{}", AUDIENCES_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// List audiences, paginated.
    pub async fn list(&self, page: PageQuery) -> MetiganResult<Page<Audience>> {
        let api_request = ApiRequest::get(AUDIENCES_PATH)
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch delivery statistics for an audience.
    pub async fn stats(&self, id: &str) -> MetiganResult<AudienceStats> {
        let api_request = ApiRequest::get(format!("{}/{}/stats", AUDIENCES_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Merge the contacts of `source_id` into `target_id`.
    ///
    /// The source audience is removed server-side; the merged target is
    /// returned.
    pub async fn merge(&self, target_id: &str, source_id: &str) -> MetiganResult<Audience> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct MergeBody<'a> {
            source_id: &'a str,
        }

        if target_id == source_id {
            return Err(MetiganError::validation(
                "Cannot merge an audience into itself",
            ));
        }

        let api_request = ApiRequest::post(format!("{}/{}/merge", AUDIENCES_PATH, target_id))
            .json(&MergeBody { source_id })?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Remove unsubscribed and bounced contacts from an audience.
    pub async fn clean(&self, id: &str) -> MetiganResult<CleanResult> {
        let api_request = ApiRequest::post(format!("{}/{}/clean", AUDIENCES_PATH, id))
            .json(&serde_json::json!({}))?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }
}
