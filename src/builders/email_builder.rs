//! Fluent builder for send email requests.

use crate::types::{Attachment, SendEmailRequest};

use super::BuilderError;

/// Builder for constructing [`SendEmailRequest`] with a fluent API.
///
/// # Examples
///
/// ```rust
/// use metigan::builders::EmailBuilder;
///
/// let request = EmailBuilder::new()
///     .from("Acme <hello@acme.com>")
///     .to("recipient1@example.com")
///     .to("recipient2@example.com")
///     .cc("cc@example.com")
///     .reply_to("support@acme.com")
///     .subject("Meeting Invitation")
///     .html("<p>You're invited</p>")
///     .build()?;
///
/// assert_eq!(request.to.len(), 2);
/// # Ok::<(), metigan::builders::BuilderError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailBuilder {
    from: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
    text: Option<String>,
    template_id: Option<String>,
    variables: serde_json::Map<String, serde_json::Value>,
    attachments: Vec<Attachment>,
}

impl EmailBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address. Accepts `addr@example.com` or
    /// `"Display Name <addr@example.com>"`.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Add a recipient. Call repeatedly for multiple recipients.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Add a carbon-copy recipient.
    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc.push(cc.into());
        self
    }

    /// Add a blind carbon-copy recipient.
    pub fn bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc.push(bcc.into());
        self
    }

    /// Set the Reply-To address.
    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the plain-text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Render a stored template server-side instead of sending a body.
    pub fn template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Set one template variable.
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Assemble the request.
    ///
    /// # Errors
    ///
    /// Returns an error when `from`, a recipient, the subject, or every
    /// body variant is missing. Deeper validation (address syntax,
    /// attachment gates, sanitization) happens in the email service.
    pub fn build(self) -> Result<SendEmailRequest, BuilderError> {
        let from = self.from.ok_or(BuilderError::MissingField("from"))?;
        if self.to.is_empty() {
            return Err(BuilderError::MissingField("to"));
        }
        let subject = self.subject.ok_or(BuilderError::MissingField("subject"))?;

        if self.html.is_none() && self.text.is_none() && self.template_id.is_none() {
            return Err(BuilderError::MissingField("html, text, or template"));
        }

        if !self.variables.is_empty() && self.template_id.is_none() {
            return Err(BuilderError::InvalidField {
                field: "variables",
                message: "Template variables require a template".to_string(),
            });
        }

        Ok(SendEmailRequest {
            from,
            to: self.to,
            subject,
            html: self.html,
            text: self.text,
            reply_to: self.reply_to,
            cc: self.cc,
            bcc: self.bcc,
            attachments: self.attachments,
            template_id: self.template_id,
            variables: if self.variables.is_empty() {
                None
            } else {
                Some(self.variables)
            },
        })
    }
}
