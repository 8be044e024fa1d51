use std::fs;
use std::path::Path;

use crate::HP;

const ACCEPTED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    #[error("Please upload a text file, PDF, or Word document")]
    UnsupportedType { name: String },

    #[error("File size must be less than 10MB")]
    TooLarge { name: String, size: u64 },

    #[error("Error reading file. Please try again.")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// MIME type implied by a file name's extension, if it is one we know.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        _ => None,
    }
}

/// Check an upload before reading it. Type is checked before size.
pub fn validate_upload(name: &str, mime: Option<&str>, size: u64) -> Result<(), InputError> {
    let accepted_mime = mime.is_some_and(|m| ACCEPTED_MIME_TYPES.contains(&m));
    if !accepted_mime && !name.ends_with(".txt") {
        tracing::warn!(name, mime = mime.unwrap_or(""), "Rejected upload type");
        return Err(InputError::UnsupportedType {
            name: name.to_string(),
        });
    }

    if size > HP.upload_max_bytes {
        tracing::warn!(name, size, "Rejected oversized upload");
        return Err(InputError::TooLarge {
            name: name.to_string(),
            size,
        });
    }

    Ok(())
}

/// Validate and read a file from disk, decoding it as UTF-8 with invalid
/// sequences replaced.
///
/// PDF and Word files are not parsed; their bytes are decoded as text like
/// any other upload.
pub fn read_upload(path: &Path) -> Result<String, InputError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let read_err = |source| InputError::Read {
        name: name.clone(),
        source,
    };

    let size = fs::metadata(path).map_err(read_err)?.len();
    validate_upload(&name, mime_for_name(&name), size)?;

    let bytes = fs::read(path).map_err(read_err)?;
    tracing::debug!(name = %name, bytes = bytes.len(), "Read upload");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
