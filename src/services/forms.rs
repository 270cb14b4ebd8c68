//! Hosted form operations.
//!
//! Forms live under `/api/forms`; the public submission endpoint for a
//! published form is `/f/{slug}/api`, which requires no API key
//! server-side but is reached through the same authenticated client here.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{MetiganError, MetiganResult};
use crate::http::ApiRequest;
use crate::types::form::UpdateFormRequest;
use crate::types::{Ack, CreateFormRequest, Form, FormSubmission, Page, PageQuery};

use super::ServiceContext;

const FORMS_PATH: &str = "/api/forms";

/// Service for managing hosted forms and their submissions.
pub struct FormService {
    ctx: ServiceContext,
}

impl FormService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a form. At least one field is required, and field names
    /// must be unique.
    pub async fn create(&self, mut request: CreateFormRequest) -> MetiganResult<Form> {
        request.title = request.title.trim().to_string();
        if request.title.is_empty() {
            return Err(MetiganError::validation_field("Form title is required", "title"));
        }
        if request.fields.is_empty() {
            return Err(MetiganError::validation_field(
                "A form needs at least one field",
                "fields",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for field in &request.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(MetiganError::validation_field(
                    format!("Duplicate field name: {}", field.name),
                    "fields",
                ));
            }
        }

        let api_request = ApiRequest::post(FORMS_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch a form by id.
    pub async fn get(&self, id: &str) -> MetiganResult<Form> {
        let api_request = ApiRequest::get(format!("{}/{}", FORMS_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Update a form.
    pub async fn update(&self, id: &str, request: UpdateFormRequest) -> MetiganResult<Form> {
        if let Some(fields) = &request.fields {
            if fields.is_empty() {
                return Err(MetiganError::validation_field(
                    "A form needs at least one field",
                    "fields",
                ));
            }
        }

        let api_request = ApiRequest::put(format!("{}/{}", FORMS_PATH, id)).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Delete a form.
    pub async fn delete(&self, id: &str) -> MetiganResult<Ack> {
        let api_request = ApiRequest::delete(format!("{}/{}", FORMS_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// List forms, paginated.
    pub async fn list(&self, page: PageQuery) -> MetiganResult<Page<Form>> {
        let api_request = ApiRequest::get(FORMS_PATH)
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Publish a form, making its public endpoint live.
    pub async fn publish(&self, id: &str) -> MetiganResult<Form> {
        let api_request = ApiRequest::post(format!("{}/{}/publish", FORMS_PATH, id))
            .json(&serde_json::json!({}))?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// List submissions received through a form's public endpoint.
    pub async fn submissions(
        &self,
        slug: &str,
        page: PageQuery,
    ) -> MetiganResult<Page<FormSubmission>> {
        let api_request = ApiRequest::get(format!("/f/{}/api", slug))
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Submit values to a form's public endpoint.
    pub async fn submit(
        &self,
        slug: &str,
        values: HashMap<String, serde_json::Value>,
    ) -> MetiganResult<Ack> {
        #[derive(Serialize)]
        struct SubmitBody {
            values: HashMap<String, serde_json::Value>,
        }

        if values.is_empty() {
            return Err(MetiganError::validation_field(
                "Submission values are required",
                "values",
            ));
        }

        let api_request =
            ApiRequest::post(format!("/f/{}/api", slug)).json(&SubmitBody { values })?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::mock_context;
    use crate::types::FormField;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> FormService {
        FormService::new(mock_context(server).await)
    }

    fn form_json() -> serde_json::Value {
        serde_json::json!({
            "id": "form_1",
            "title": "Signup",
            "slug": "signup",
            "fields": [
                {"name": "email", "label": "Email", "type": "email", "required": true}
            ],
            "published": false,
        })
    }

    #[tokio::test]
    async fn create_requires_fields() {
        let server = MockServer::start().await;
        let svc = service(&server).await;

        let error = svc
            .create(CreateFormRequest {
                title: "Signup".to_string(),
                fields: vec![],
                audience_id: None,
            })
            .await
            .unwrap_err();

        match error {
            MetiganError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("fields")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_field_names() {
        let server = MockServer::start().await;
        let svc = service(&server).await;

        let error = svc
            .create(CreateFormRequest {
                title: "Signup".to_string(),
                fields: vec![FormField::email(), FormField::email()],
                audience_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(error, MetiganError::Validation { .. }));
    }

    #[tokio::test]
    async fn create_and_publish() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/forms"))
            .respond_with(ResponseTemplate::new(201).set_body_json(form_json()))
            .expect(1)
            .mount(&server)
            .await;

        let mut published = form_json();
        published["published"] = serde_json::json!(true);
        Mock::given(method("POST"))
            .and(path("/api/forms/form_1/publish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(published))
            .expect(1)
            .mount(&server)
            .await;

        let svc = service(&server).await;

        let form = svc
            .create(CreateFormRequest {
                title: "Signup".to_string(),
                fields: vec![FormField::email()],
                audience_id: None,
            })
            .await
            .unwrap();
        assert!(!form.published);

        let form = svc.publish(&form.id).await.unwrap();
        assert!(form.published);
    }

    #[tokio::test]
    async fn submissions_use_public_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/f/signup/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"id": "sub_1", "values": {"email": "ada@example.com"}}
                ],
                "total": 1,
                "page": 1,
                "limit": 50,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = service(&server)
            .await
            .submissions("signup", PageQuery::default())
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].values["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn submit_requires_values() {
        let server = MockServer::start().await;
        let svc = service(&server).await;

        let error = svc.submit("signup", HashMap::new()).await.unwrap_err();
        assert!(matches!(error, MetiganError::Validation { .. }));
    }

    #[tokio::test]
    async fn submit_posts_to_public_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/f/signup/api"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut values = HashMap::new();
        values.insert(
            "email".to_string(),
            serde_json::json!("ada@example.com"),
        );

        let ack = service(&server).await.submit("signup", values).await.unwrap();
        assert!(ack.success);
    }
}
