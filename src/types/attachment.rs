//! Attachment model and validation gates.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{MetiganError, MetiganResult};

/// Maximum attachment size per file: 7 MB.
pub const MAX_ATTACHMENT_SIZE: usize = 7 * 1024 * 1024;

/// MIME types accepted without comment.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/csv",
    "text/html",
    "text/calendar",
    "application/pdf",
    "application/json",
    "application/zip",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "audio/mpeg",
    "video/mp4",
];

/// MIME types that draw a warning. Advisory only: the declared type is
/// client-supplied and unreliable, so it never blocks an upload by itself.
pub const BLOCKED_MIME_TYPES: &[&str] = &[
    "application/x-msdownload",
    "application/x-msdos-program",
    "application/x-executable",
    "application/x-sh",
    "application/x-bat",
    "application/java-archive",
    "application/hta",
    "application/x-ms-shortcut",
];

/// File extensions rejected outright, whatever the declared MIME type.
pub const BLOCKED_EXTENSIONS: &[&str] = &[
    "exe", "dll", "bat", "cmd", "com", "msi", "scr", "pif", "jar", "js", "jse", "vbs", "vbe",
    "ws", "wsf", "wsh", "ps1", "psm1", "sh", "app", "hta", "cpl", "lnk", "reg",
];

/// How attachments are encoded onto the wire.
///
/// Selected once at client construction; there is no runtime sniffing of
/// the execution environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentEncoding {
    /// JSON request body with base64-embedded attachment payloads.
    #[default]
    Json,
    /// `multipart/form-data` upload (form-building contexts).
    Multipart,
}

/// Attachment payload, tagged by how the bytes were supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AttachmentContent {
    /// In-memory binary content.
    Bytes {
        /// The raw bytes.
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
    /// Content already base64-encoded by the caller.
    Base64 {
        /// The encoded payload.
        data: String,
    },
}

impl AttachmentContent {
    /// Decoded size in bytes (estimated from the encoded length for the
    /// `Base64` variant).
    pub fn byte_len(&self) -> usize {
        match self {
            AttachmentContent::Bytes { data } => data.len(),
            AttachmentContent::Base64 { data } => data.len() / 4 * 3,
        }
    }

    /// The payload as a base64 string, encoding if necessary.
    pub fn to_base64(&self) -> String {
        match self {
            AttachmentContent::Bytes { data } => {
                base64::engine::general_purpose::STANDARD.encode(data)
            }
            AttachmentContent::Base64 { data } => data.clone(),
        }
    }

    /// The payload as raw bytes, decoding if necessary.
    pub fn to_bytes(&self) -> MetiganResult<Vec<u8>> {
        match self {
            AttachmentContent::Bytes { data } => Ok(data.clone()),
            AttachmentContent::Base64 { data } => base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|_| MetiganError::validation("attachment content is not valid base64")),
        }
    }
}

/// An email attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the recipient.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// The payload.
    pub content: AttachmentContent,
}

impl Attachment {
    /// Create an attachment from in-memory bytes, guessing the MIME type
    /// from the file name when not supplied.
    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            content_type,
            content: AttachmentContent::Bytes { data },
        }
    }

    /// Create an attachment from a pre-encoded base64 payload.
    pub fn from_base64(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: AttachmentContent::Base64 { data: data.into() },
        }
    }

    /// Apply the attachment gates.
    ///
    /// The extension denylist and the 7 MB size ceiling are hard gates.
    /// The MIME-type lists are advisory only and merely log a warning,
    /// since declared MIME types are client-supplied and unreliable.
    pub fn validate(&self) -> MetiganResult<()> {
        let extension = self
            .filename
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if BLOCKED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(MetiganError::validation_field(
                format!("attachment '{}' has a blocked file extension", self.filename),
                "attachments",
            ));
        }

        if self.content.byte_len() > MAX_ATTACHMENT_SIZE {
            return Err(MetiganError::validation_field(
                format!(
                    "attachment '{}' exceeds the {} byte size limit",
                    self.filename, MAX_ATTACHMENT_SIZE
                ),
                "attachments",
            ));
        }

        let mime = self.content_type.to_ascii_lowercase();
        if BLOCKED_MIME_TYPES.contains(&mime.as_str()) {
            tracing::warn!(
                filename = %self.filename,
                content_type = %self.content_type,
                "attachment declares a blocked MIME type; sending anyway"
            );
        } else if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
            tracing::warn!(
                filename = %self.filename,
                content_type = %self.content_type,
                "attachment declares an unrecognized MIME type"
            );
        }

        Ok(())
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_extension_rejected() {
        let attachment = Attachment::from_base64("payload.exe", "application/pdf", "QUJD");
        let err = attachment.validate().unwrap_err();
        assert!(err.to_string().contains("payload.exe"));
        assert!(matches!(err, MetiganError::Validation { .. }));
    }

    #[test]
    fn test_blocked_extension_case_insensitive() {
        let attachment = Attachment::from_bytes("Setup.EXE", vec![0u8; 16]);
        assert!(attachment.validate().is_err());
    }

    #[test]
    fn test_pdf_accepted() {
        let attachment = Attachment::from_bytes("report.pdf", vec![1, 2, 3]);
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(attachment.validate().is_ok());
    }

    #[test]
    fn test_size_ceiling() {
        let attachment = Attachment::from_bytes("big.pdf", vec![0u8; MAX_ATTACHMENT_SIZE + 1]);
        let err = attachment.validate().unwrap_err();
        assert!(err.to_string().contains("big.pdf"));

        let at_limit = Attachment::from_bytes("fits.pdf", vec![0u8; MAX_ATTACHMENT_SIZE]);
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_seven_megabytes_exactly() {
        assert_eq!(MAX_ATTACHMENT_SIZE, 7_340_032);
    }

    #[test]
    fn test_unknown_mime_is_advisory_only() {
        let attachment = Attachment::from_base64("notes.xyz", "application/x-unknown", "QUJD");
        assert!(attachment.validate().is_ok());
    }

    #[test]
    fn test_blocked_mime_is_advisory_only() {
        // MIME is client-supplied; only the extension gate is hard.
        let attachment = Attachment::from_base64("data.bin", "application/x-msdownload", "QUJD");
        assert!(attachment.validate().is_ok());
    }

    #[test]
    fn test_content_roundtrip() {
        let content = AttachmentContent::Bytes {
            data: b"hello".to_vec(),
        };
        assert_eq!(content.to_base64(), "aGVsbG8=");

        let encoded = AttachmentContent::Base64 {
            data: "aGVsbG8=".to_string(),
        };
        assert_eq!(encoded.to_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_tagged_serialization() {
        let attachment = Attachment::from_base64("a.pdf", "application/pdf", "QUJD");
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["content"]["kind"], "base64");
    }
}
