//! Resume uploads accepted at the greeting stage.
//!
//! The file itself is not kept. PDF uploads have their text pulled out with
//! `pdf-extract`; Word documents are recorded by name only.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::ResumeAttachment;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Largest upload the resume route accepts.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResumeError {
    #[error("Resume must be a PDF, DOC or DOCX file")]
    UnsupportedType,

    #[error("Resume file is empty")]
    Empty,

    #[error("Resume file is larger than {} MB", MAX_RESUME_BYTES / (1024 * 1024))]
    TooLarge,
}

/// Lower-cased extension of `file_name`, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Checks name and size, returning the accepted extension.
pub fn check_upload(file_name: &str, size_bytes: usize) -> Result<String, ResumeError> {
    let ext = file_extension(file_name)
        .filter(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or(ResumeError::UnsupportedType)?;
    if size_bytes == 0 {
        return Err(ResumeError::Empty);
    }
    if size_bytes > MAX_RESUME_BYTES {
        return Err(ResumeError::TooLarge);
    }
    Ok(ext)
}

pub async fn read_resume(
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
) -> Result<ResumeAttachment, ResumeError> {
    let ext = check_upload(&file_name, data.len())?;
    let size_bytes = data.len();

    let extracted_text = if ext == "pdf" {
        extract_pdf_text(data).await
    } else {
        None
    };
    debug!(
        "Read resume {file_name} ({size_bytes} bytes, text extracted: {})",
        extracted_text.is_some()
    );

    Ok(ResumeAttachment {
        file_name,
        content_type,
        size_bytes,
        extracted_text,
    })
}

async fn extract_pdf_text(data: Bytes) -> Option<String> {
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!("Could not extract text from resume: {e}");
            None
        }
        Err(e) => {
            warn!("Resume text extraction aborted: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(file_extension("CV.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("resume.final.docx").as_deref(), Some("docx"));
        assert_eq!(file_extension("resume"), None);
        assert_eq!(file_extension(".pdf"), None);
    }

    #[test]
    fn test_only_document_types_are_accepted() {
        assert_eq!(check_upload("cv.doc", 10), Ok("doc".to_string()));
        assert_eq!(check_upload("cv.txt", 10), Err(ResumeError::UnsupportedType));
        assert_eq!(check_upload("cv.png", 10), Err(ResumeError::UnsupportedType));
    }

    #[test]
    fn test_size_limits() {
        assert_eq!(check_upload("cv.pdf", 0), Err(ResumeError::Empty));
        assert_eq!(
            check_upload("cv.pdf", MAX_RESUME_BYTES + 1),
            Err(ResumeError::TooLarge)
        );
    }

    #[tokio::test]
    async fn test_word_documents_have_no_text() {
        let attachment = read_resume(
            "cv.docx".to_string(),
            None,
            Bytes::from_static(b"PK\x03\x04 not really a docx"),
        )
        .await
        .unwrap();
        assert_eq!(attachment.size_bytes, 22);
        assert!(!attachment.has_text());
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_kept_without_text() {
        let attachment = read_resume(
            "cv.pdf".to_string(),
            Some("application/pdf".to_string()),
            Bytes::from_static(b"definitely not a pdf"),
        )
        .await
        .unwrap();
        assert_eq!(attachment.file_name, "cv.pdf");
        assert!(attachment.extracted_text.is_none());
    }
}
