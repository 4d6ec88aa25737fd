use bytes::Bytes;

use super::domain::ResumeAttachment;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";

/// MIME types accepted for resumes, paired with the extension shown to users.
pub const ALLOWED_RESUME_TYPES: [(&str, &str); 3] = [
    (PDF_MIME, ".pdf"),
    (DOC_MIME, ".doc"),
    (DOCX_MIME, ".docx"),
];

/// A file picked or dropped by the user, before any checks.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub mime_type: String,
    pub declared_size: u64,
    pub content: Bytes,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            declared_size: content.len() as u64,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Invalid file type. Please upload one of: {allowed}")]
    UnsupportedType { found: String, allowed: String },
    #[error("File is too large. Max size is {max_size_mb}MB.")]
    TooLarge { size: u64, max_size_mb: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePolicy {
    max_size_mb: u64,
}

impl ResumePolicy {
    pub const DEFAULT_MAX_SIZE_MB: u64 = 5;

    pub fn with_max_size_mb(max_size_mb: u64) -> Self {
        Self { max_size_mb }
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    /// Parameters such as `; charset=binary` are ignored.
    pub fn allows_type(&self, mime_type: &str) -> bool {
        let Ok(parsed) = mime_type.trim().parse::<mime::Mime>() else {
            return false;
        };
        ALLOWED_RESUME_TYPES
            .iter()
            .any(|(allowed, _)| parsed.essence_str().eq_ignore_ascii_case(allowed))
    }

    pub fn allowed_extensions() -> String {
        ALLOWED_RESUME_TYPES
            .iter()
            .map(|(_, extension)| *extension)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self::with_max_size_mb(Self::DEFAULT_MAX_SIZE_MB)
    }
}

/// Gatekeeper between the file picker and the employee draft.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeUploader {
    policy: ResumePolicy,
}

impl ResumeUploader {
    pub fn new(policy: ResumePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResumePolicy {
        &self.policy
    }

    /// Type is checked before size; the declared size is trusted as the browser reports it.
    pub fn accept(&self, upload: ResumeUpload) -> Result<ResumeAttachment, UploadRejection> {
        self.screen(&upload.file_name, &upload.mime_type, upload.declared_size)?;

        Ok(ResumeAttachment {
            file_name: upload.file_name,
            mime_type: upload.mime_type,
            size: upload.declared_size,
            content: upload.content,
        })
    }

    /// The checks behind [`ResumeUploader::accept`], usable before the content has been read.
    pub fn screen(
        &self,
        file_name: &str,
        mime_type: &str,
        declared_size: u64,
    ) -> Result<(), UploadRejection> {
        if !self.policy.allows_type(mime_type) {
            tracing::debug!(%file_name, %mime_type, "resume rejected: unsupported type");
            return Err(UploadRejection::UnsupportedType {
                found: mime_type.to_string(),
                allowed: ResumePolicy::allowed_extensions(),
            });
        }

        if declared_size > self.policy.max_size_bytes() {
            tracing::debug!(
                %file_name,
                size = declared_size,
                limit = self.policy.max_size_bytes(),
                "resume rejected: too large"
            );
            return Err(UploadRejection::TooLarge {
                size: declared_size,
                max_size_mb: self.policy.max_size_mb,
            });
        }

        Ok(())
    }
}
