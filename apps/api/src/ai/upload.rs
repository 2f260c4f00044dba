//! Resume file uploads: multipart field reading, type and size checks, and
//! text extraction for the AI façade.

use axum::extract::Multipart;
use tracing::debug;

use crate::errors::AppError;

/// Largest accepted resume upload.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
/// Multipart field carrying the file.
pub const RESUME_FIELD: &str = "resume";
/// Request body limit for the upload route: the file plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

impl ResumeFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=binary".
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(ResumeFormat::Pdf),
            "application/msword" => Some(ResumeFormat::Doc),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(ResumeFormat::Docx)
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub format: ResumeFormat,
    pub bytes: Vec<u8>,
}

/// Reads the `resume` field, rejecting unsupported types and oversize files.
/// Other fields are skipped.
pub async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let format = field
            .content_type()
            .and_then(ResumeFormat::from_mime)
            .ok_or_else(|| {
                AppError::Validation(
                    "Invalid file type. Only PDF and DOC files are allowed.".to_string(),
                )
            })?;
        let file_name = field.file_name().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len() + chunk.len() > MAX_RESUME_BYTES {
                return Err(AppError::Validation(format!(
                    "File too large. Maximum size is {} MB.",
                    MAX_RESUME_BYTES / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded resume is empty".to_string()));
        }

        debug!(
            "Received resume upload {:?} ({:?}, {} bytes)",
            file_name,
            format,
            bytes.len()
        );
        return Ok(ResumeUpload {
            file_name,
            format,
            bytes,
        });
    }

    Err(AppError::Validation("No resume file provided".to_string()))
}

/// Extracts plain text from an upload. Document parsing is CPU-bound and
/// runs on the blocking pool.
pub async fn extract_text(upload: ResumeUpload) -> Result<String, AppError> {
    let format = upload.format;
    if format == ResumeFormat::Doc {
        return Err(AppError::Validation(
            "Unsupported legacy Word format. Please upload a PDF or DOCX file.".to_string(),
        ));
    }

    let bytes = upload.bytes;
    let text = tokio::task::spawn_blocking(move || match format {
        ResumeFormat::Pdf => {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        }
        _ => docx_text(&bytes).map_err(|e| e.to_string()),
    })
    .await
    .map_err(|e| unreadable(format, &e.to_string()))?
    .map_err(|e| unreadable(format, &e))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text)
}

fn unreadable(format: ResumeFormat, cause: &str) -> AppError {
    let kind = match format {
        ResumeFormat::Pdf => "PDF",
        ResumeFormat::Doc | ResumeFormat::Docx => "Word",
    };
    AppError::Validation(format!("Could not read {kind} resume: {cause}"))
}

/// Paragraph text of a DOCX body, one line per paragraph.
fn docx_text(bytes: &[u8]) -> Result<String, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;
    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for run in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = run {
                    for piece in run.children {
                        if let docx_rs::RunChild::Text(t) = piece {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{multipart_request, sample_docx};
    use axum::extract::FromRequest;

    async fn multipart(field: &str, content_type: &str, data: &[u8]) -> Multipart {
        let request = multipart_request("/", field, "resume.bin", content_type, data);
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[test]
    fn test_accepted_mime_types() {
        assert_eq!(ResumeFormat::from_mime("application/pdf"), Some(ResumeFormat::Pdf));
        assert_eq!(ResumeFormat::from_mime("application/msword"), Some(ResumeFormat::Doc));
        assert_eq!(
            ResumeFormat::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(ResumeFormat::Docx)
        );
        assert_eq!(
            ResumeFormat::from_mime("Application/PDF; charset=binary"),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(ResumeFormat::from_mime("text/plain"), None);
        assert_eq!(ResumeFormat::from_mime("image/png"), None);
    }

    #[tokio::test]
    async fn test_reads_resume_field() {
        let upload = read_resume_upload(multipart("resume", "application/pdf", b"%PDF-1.4").await)
            .await
            .unwrap();
        assert_eq!(upload.format, ResumeFormat::Pdf);
        assert_eq!(upload.file_name.as_deref(), Some("resume.bin"));
        assert_eq!(upload.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_rejects_wrong_type() {
        let err = read_resume_upload(multipart("resume", "text/plain", b"hello there").await)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m.starts_with("Invalid file type"))
        );
    }

    #[tokio::test]
    async fn test_rejects_missing_field() {
        let err = read_resume_upload(multipart("avatar", "application/pdf", b"%PDF").await)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "No resume file provided"));
    }

    #[tokio::test]
    async fn test_docx_upload_extracts_paragraph_text() {
        let bytes = sample_docx(&["Jane Doe", "Senior Rust Engineer", "Skills: Rust, Tokio"]);
        // A real OOXML package is a zip archive.
        assert!(bytes.starts_with(b"PK"));

        let upload = ResumeUpload {
            file_name: Some("jane.docx".to_string()),
            format: ResumeFormat::Docx,
            bytes,
        };
        let text = extract_text(upload).await.unwrap();
        assert!(text.contains("Jane Doe\nSenior Rust Engineer\nSkills: Rust, Tokio"));
        assert!(!text.contains("word/document.xml"));
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_a_validation_error() {
        let upload = ResumeUpload {
            file_name: None,
            format: ResumeFormat::Docx,
            bytes: b"PK\x03\x04 truncated archive".to_vec(),
        };
        let err = extract_text(upload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("Could not read Word resume")));
    }

    #[tokio::test]
    async fn test_legacy_doc_is_rejected() {
        let upload = ResumeUpload {
            file_name: None,
            format: ResumeFormat::Doc,
            bytes: b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1".to_vec(),
        };
        let err = extract_text(upload).await.unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m.starts_with("Unsupported legacy Word format"))
        );
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_a_validation_error() {
        let upload = ResumeUpload {
            file_name: None,
            format: ResumeFormat::Pdf,
            bytes: b"definitely not a pdf".to_vec(),
        };
        let err = extract_text(upload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
