use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Extensions accepted for upload with their MIME types. Matched case-insensitively.
pub const ACCEPTED_EXTENSIONS: [(&str, &str); 2] = [
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: unsupported file type, expected .doc or .docx", .path.display())]
    UnsupportedExtension { path: PathBuf },
    #[error("{}: not a file name", .path.display())]
    MissingFileName { path: PathBuf },
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// A document read from disk and ready to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Hex SHA-256 of the document, used to correlate submissions in logs.
    pub fn sha256_hex(&self) -> String {
        Sha256::digest(&self.bytes)
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    ACCEPTED_EXTENSIONS
        .iter()
        .find(|(accepted, _)| accepted.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// Read a document for upload. Only the extension is checked, never the content.
pub fn load_upload(path: &Path) -> Result<UploadFile, LoadError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| LoadError::MissingFileName {
            path: path.to_path_buf(),
        })?;
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(UploadFile::new(file_name, mime_type, Bytes::from(bytes)))
}
