//! Multipart submissions: the application JSON plus an optional resume file.
//!
//! Resumes are stored in S3 next to the application snapshot. PDF text is
//! extracted on a blocking thread and fed to the scoring panel; an
//! unreadable PDF is logged and the submission continues without it.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::Multipart;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRecord;

/// Resume text beyond this many characters is dropped before scoring.
pub const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("multipart body has no `application` part")]
    MissingApplication,

    #[error("`application` part is not a valid application: {0}")]
    InvalidApplication(String),

    #[error("resume must be PDF, DOC or DOCX (got {0})")]
    UnsupportedType(String),

    #[error("resume is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(_) => AppError::UnsupportedMediaType(err.to_string()),
            UploadError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::MissingApplication | UploadError::InvalidApplication(_) => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Pdf,
    Doc,
    Docx,
}

impl ResumeKind {
    /// Resolves the declared content type, falling back to the file extension
    /// when the client sent a generic type.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let by_type = content_type.and_then(|ct| {
            match ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase().as_str() {
                "application/pdf" => Some(Self::Pdf),
                "application/msword" => Some(Self::Doc),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(Self::Docx)
                }
                _ => None,
            }
        });
        if by_type.is_some() {
            return by_type;
        }

        let generic = content_type
            .map(|ct| ct.trim().is_empty() || ct.starts_with("application/octet-stream"))
            .unwrap_or(true);
        if !generic {
            return None;
        }

        let ext = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub kind: ResumeKind,
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct MultipartSubmission {
    pub record: ApplicationRecord,
    pub resume: Option<ResumeUpload>,
}

/// Reads the `application` and `resume` parts. Unknown parts are skipped.
/// An empty `resume` part (a form submitted without choosing a file) counts
/// as no resume.
pub async fn read_submission(
    mut multipart: Multipart,
    max_resume_bytes: usize,
) -> Result<MultipartSubmission, AppError> {
    let mut record: Option<ApplicationRecord> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "application" => {
                let text = field.text().await?;
                let parsed = serde_json::from_str::<ApplicationRecord>(&text)
                    .map_err(|e| UploadError::InvalidApplication(e.to_string()))?;
                record = Some(parsed);
            }
            "resume" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.trim().is_empty());
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    debug!("Empty resume part ignored");
                    continue;
                }
                if bytes.len() > max_resume_bytes {
                    return Err(UploadError::TooLarge {
                        size: bytes.len(),
                        limit: max_resume_bytes,
                    }
                    .into());
                }
                let kind = ResumeKind::detect(content_type.as_deref(), file_name.as_deref())
                    .ok_or_else(|| {
                        UploadError::UnsupportedType(
                            content_type.unwrap_or_else(|| "unknown".to_string()),
                        )
                    })?;
                resume = Some(ResumeUpload {
                    kind,
                    file_name,
                    bytes,
                });
            }
            other => debug!("Ignoring multipart part '{other}'"),
        }
    }

    let record = record.ok_or(UploadError::MissingApplication)?;
    Ok(MultipartSubmission { record, resume })
}

/// Writes one object to the application's bucket.
pub async fn put_object(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
    metadata: &[(&str, String)],
) -> Result<(), AppError> {
    let mut request = s3
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type);
    for (name, value) in metadata {
        request = request.metadata(*name, value.as_str());
    }

    request
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Uploaded s3://{bucket}/{key}");
    Ok(())
}

pub fn resume_key(application_id: Uuid, kind: ResumeKind) -> String {
    format!("applications/{application_id}/resume.{}", kind.extension())
}

/// S3 user metadata for a resume. Header values must be printable ASCII, so
/// anything else in the client's file name is replaced.
pub fn resume_metadata(resume: &ResumeUpload) -> Vec<(&'static str, String)> {
    match &resume.file_name {
        Some(name) => {
            let safe: String = name
                .chars()
                .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
                .collect();
            vec![("original-filename", safe)]
        }
        None => Vec::new(),
    }
}

/// Stores the resume and returns its object key.
pub async fn store_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    application_id: Uuid,
    resume: &ResumeUpload,
) -> Result<String, AppError> {
    let key = resume_key(application_id, resume.kind);
    put_object(
        s3,
        bucket,
        &key,
        resume.bytes.clone(),
        resume.kind.mime_type(),
        &resume_metadata(resume),
    )
    .await?;
    Ok(key)
}

/// Extracts plain text from a PDF. Returns `None` when the document has no
/// extractable text or cannot be parsed.
pub async fn extract_pdf_text(bytes: Bytes) -> Option<String> {
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match extracted {
        Ok(Ok(text)) => {
            let text = truncate_chars(text.trim(), MAX_RESUME_CHARS);
            if text.is_empty() {
                warn!("Resume PDF contained no extractable text");
                None
            } else {
                Some(text)
            }
        }
        Ok(Err(e)) => {
            warn!("Resume PDF text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("Resume PDF extraction task failed: {e}");
            None
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
