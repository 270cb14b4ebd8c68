//! Email template operations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MetiganError, MetiganResult};
use crate::http::ApiRequest;
use crate::types::{Ack, CreateTemplateRequest, Page, PageQuery, Template, UpdateTemplateRequest};

use super::ServiceContext;

const TEMPLATES_PATH: &str = "/api/templates";

/// Matches `{{name}}` placeholders, tolerating inner whitespace.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("placeholder regex"));

/// Substitute `{{placeholder}}` slots in `html` with values from
/// `variables`. Placeholders with no matching variable are left intact.
///
/// # Examples
///
/// ```
/// use metigan::services::templates::render;
///
/// let mut vars = serde_json::Map::new();
/// vars.insert("name".to_string(), serde_json::json!("Ada"));
///
/// let html = render("<p>Hi {{ name }}, {{missing}}</p>", &vars);
/// assert_eq!(html, "<p>Hi Ada, {{missing}}</p>");
/// ```
pub fn render(html: &str, variables: &serde_json::Map<String, serde_json::Value>) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &regex::Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Service for managing stored email templates.
pub struct TemplateService {
    ctx: ServiceContext,
}

impl TemplateService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a template.
    pub async fn create(&self, mut request: CreateTemplateRequest) -> MetiganResult<Template> {
        request.name = request.name.trim().to_string();
        if request.name.is_empty() {
            return Err(MetiganError::validation_field(
                "Template name is required",
                "name",
            ));
        }
        if request.html.trim().is_empty() {
            return Err(MetiganError::validation_field(
                "Template body is required",
                "html",
            ));
        }

        let api_request = ApiRequest::post(TEMPLATES_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch a template by id.
    pub async fn get(&self, id: &str) -> MetiganResult<Template> {
        let api_request = ApiRequest::get(format!("{}/{}", TEMPLATES_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Update a template.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateTemplateRequest,
    ) -> MetiganResult<Template> {
        let api_request = ApiRequest::put(format!("{}/{}", TEMPLATES_PATH, id)).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Delete a template.
    pub async fn delete(&self, id: &str) -> MetiganResult<Ack> {
        let api_request = ApiRequest::delete(format!("{}/{}", TEMPLATES_PATH, id));
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// List templates, paginated.
    pub async fn list(&self, page: PageQuery) -> MetiganResult<Page<Template>> {
        let api_request = ApiRequest::get(TEMPLATES_PATH)
            .query("page", page.page.to_string())
            .query("limit", page.limit.to_string());
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Fetch a template and render it locally with the given variables.
    pub async fn render_by_id(
        &self,
        id: &str,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> MetiganResult<String> {
        let template = self.get(id).await?;
        Ok(render(&template.html, variables))
    }
}
