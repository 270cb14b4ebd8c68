//! Email sending operations.
//!
//! This is the widest surface of the SDK. The full send path applies
//! every pre-flight gate (address validation, subject and HTML
//! sanitization, attachment gates) before touching the network. The OTP
//! and transactional paths are deliberately lighter; they sanitize
//! addresses and subject only and pass idempotency keys through verbatim.

use crate::error::{MetiganError, MetiganResult};
use crate::sanitize::{extract_address, is_valid_email, sanitize_email, sanitize_html, sanitize_subject};
use crate::types::attachment::AttachmentEncoding;
use crate::types::{SendEmailRequest, SendEmailResponse, SendOtpRequest, SendTransactionalRequest};

use super::payload::{encoder_for, PayloadEncoder};
use super::ServiceContext;
use crate::http::ApiRequest;

const SEND_PATH: &str = "/api/email/send";
const OTP_PATH: &str = "/api/email/otp";
const TRANSACTIONAL_PATH: &str = "/api/email/transactional";

/// Service for sending email.
///
/// # Examples
///
/// ```rust,no_run
/// use metigan::MetiganClient;
/// use metigan::types::SendEmailRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MetiganClient::builder().api_key("mg_live_xxx").build()?;
///
/// let response = client.emails().send_email(SendEmailRequest {
///     from: "Acme <hello@acme.com>".to_string(),
///     to: vec!["ada@example.com".to_string()],
///     subject: "Welcome".to_string(),
///     html: Some("<p>Hello!</p>".to_string()),
///     ..Default::default()
/// }).await?;
///
/// println!("queued: {:?}", response.message_id);
/// # Ok(())
/// # }
/// ```
pub struct EmailService {
    ctx: ServiceContext,
    sanitize: bool,
    encoder: Box<dyn PayloadEncoder>,
}

impl EmailService {
    pub(crate) fn new(ctx: ServiceContext, sanitize: bool, encoding: AttachmentEncoding) -> Self {
        Self {
            ctx,
            sanitize,
            encoder: encoder_for(encoding),
        }
    }

    /// Send an email through the full send path.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call when:
    /// - the sender or a recipient address is malformed
    /// - the subject is empty
    /// - no body (`html`, `text`, or `template_id`) is present
    /// - an attachment fails the extension or size gate
    pub async fn send_email(
        &self,
        mut request: SendEmailRequest,
    ) -> MetiganResult<SendEmailResponse> {
        self.prepare(&mut request)?;

        let api_request = self.encoder.encode(SEND_PATH, &request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Send a one-time passcode through the fast lane.
    ///
    /// Only addresses and the subject are sanitized. The idempotency key
    /// is passed through untouched so the API can deduplicate retries.
    pub async fn send_otp(&self, mut request: SendOtpRequest) -> MetiganResult<SendEmailResponse> {
        request.from = sanitize_email(&request.from);
        request.to = sanitize_email(&request.to);
        if let Some(subject) = request.subject.take() {
            request.subject = Some(sanitize_subject(&subject));
        }

        validate_address(&request.from, "from")?;
        validate_address(&request.to, "to")?;

        let api_request = ApiRequest::post(OTP_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Send a transactional email through the fast lane.
    ///
    /// Skips HTML sanitization so rendered markup reaches the API
    /// byte-for-byte; transactional content is expected to be trusted.
    pub async fn send_transactional(
        &self,
        mut request: SendTransactionalRequest,
    ) -> MetiganResult<SendEmailResponse> {
        request.from = sanitize_email(&request.from);
        request.to = sanitize_email(&request.to);
        request.subject = sanitize_subject(&request.subject);

        validate_address(&request.from, "from")?;
        validate_address(&request.to, "to")?;

        if request.subject.is_empty() {
            return Err(MetiganError::validation_field("Subject is required", "subject"));
        }
        if request.html.is_none() && request.text.is_none() && request.template_id.is_none() {
            return Err(MetiganError::validation(
                "A body is required: provide html, text, or templateId",
            ));
        }

        let api_request = ApiRequest::post(TRANSACTIONAL_PATH).json(&request)?;
        let response = self.ctx.send(api_request).await?;
        response.json()
    }

    /// Run every pre-flight gate, mutating the request into its
    /// sanitized form.
    fn prepare(&self, request: &mut SendEmailRequest) -> MetiganResult<()> {
        request.from = sanitize_email(&request.from);
        validate_address(&request.from, "from")?;

        if request.to.is_empty() {
            return Err(MetiganError::validation_field(
                "At least one recipient is required",
                "to",
            ));
        }
        for to in &mut request.to {
            *to = sanitize_email(to);
        }
        for to in &request.to {
            validate_address(to, "to")?;
        }

        for cc in &mut request.cc {
            *cc = sanitize_email(cc);
        }
        for cc in &request.cc {
            validate_address(cc, "cc")?;
        }
        for bcc in &mut request.bcc {
            *bcc = sanitize_email(bcc);
        }
        for bcc in &request.bcc {
            validate_address(bcc, "bcc")?;
        }
        if let Some(reply_to) = request.reply_to.take() {
            let reply_to = sanitize_email(&reply_to);
            validate_address(&reply_to, "replyTo")?;
            request.reply_to = Some(reply_to);
        }

        request.subject = sanitize_subject(&request.subject);
        if request.subject.is_empty() {
            return Err(MetiganError::validation_field("Subject is required", "subject"));
        }

        if request.html.is_none() && request.text.is_none() && request.template_id.is_none() {
            return Err(MetiganError::validation(
                "A body is required: provide html, text, or templateId",
            ));
        }

        if self.sanitize {
            if let Some(html) = request.html.take() {
                request.html = Some(sanitize_html(&html));
            }
        }

        for attachment in &request.attachments {
            attachment.validate()?;
        }

        self.ctx.logger.log(&format!(
            "prepared send to {} recipient(s), {} attachment(s)",
            request.to.len(),
            request.attachments.len()
        ));

        Ok(())
    }
}

/// Validate one address, naming the offending field in the error.
fn validate_address(value: &str, field: &str) -> MetiganResult<()> {
    let address = extract_address(value);
    if address.is_empty() || !is_valid_email(address) {
        return Err(MetiganError::validation_field(
            format!("Invalid email address: {}", value),
            field,
        ));
    }
    Ok(())
}
