//! Wire encodings for email payloads.
//!
//! The API accepts a send request either as a JSON document with
//! base64-encoded attachments, or as a multipart/form-data body with raw
//! attachment bytes. The encoder is chosen once at client construction
//! from [`AttachmentEncoding`] and injected into the email service.

use crate::error::MetiganResult;
use crate::http::{ApiRequest, FormPart};
use crate::types::attachment::AttachmentEncoding;
use crate::types::SendEmailRequest;

/// Turns a validated send request into a wire request.
pub trait PayloadEncoder: Send + Sync {
    /// Encode `request` into an [`ApiRequest`] targeting `path`.
    fn encode(&self, path: &str, request: &SendEmailRequest) -> MetiganResult<ApiRequest>;
}

/// Select the encoder for a configured encoding.
pub(crate) fn encoder_for(encoding: AttachmentEncoding) -> Box<dyn PayloadEncoder> {
    match encoding {
        AttachmentEncoding::Json => Box::new(JsonPayloadEncoder),
        AttachmentEncoding::Multipart => Box::new(MultipartPayloadEncoder),
    }
}

/// JSON body with attachments inlined as base64.
pub struct JsonPayloadEncoder;

impl PayloadEncoder for JsonPayloadEncoder {
    fn encode(&self, path: &str, request: &SendEmailRequest) -> MetiganResult<ApiRequest> {
        ApiRequest::post(path).json(request)
    }
}

/// multipart/form-data body with raw attachment bytes.
///
/// Scalar fields become text parts, recipient lists are comma joined,
/// and each attachment becomes a file part named `attachments`.
pub struct MultipartPayloadEncoder;

impl PayloadEncoder for MultipartPayloadEncoder {
    fn encode(&self, path: &str, request: &SendEmailRequest) -> MetiganResult<ApiRequest> {
        let mut parts = vec![
            FormPart::text("from", request.from.clone()),
            FormPart::text("to", request.to.join(",")),
            FormPart::text("subject", request.subject.clone()),
        ];

        if let Some(html) = &request.html {
            parts.push(FormPart::text("html", html.clone()));
        }
        if let Some(text) = &request.text {
            parts.push(FormPart::text("text", text.clone()));
        }
        if let Some(reply_to) = &request.reply_to {
            parts.push(FormPart::text("replyTo", reply_to.clone()));
        }
        if !request.cc.is_empty() {
            parts.push(FormPart::text("cc", request.cc.join(",")));
        }
        if !request.bcc.is_empty() {
            parts.push(FormPart::text("bcc", request.bcc.join(",")));
        }
        if let Some(template_id) = &request.template_id {
            parts.push(FormPart::text("templateId", template_id.clone()));
        }
        if let Some(variables) = &request.variables {
            parts.push(FormPart::text(
                "variables",
                serde_json::to_string(variables)?,
            ));
        }

        for attachment in &request.attachments {
            parts.push(FormPart::file(
                "attachments",
                attachment.filename.clone(),
                attachment.content_type.clone(),
                attachment.content.to_bytes()?,
            ));
        }

        Ok(ApiRequest::post(path).multipart(parts))
    }
}
