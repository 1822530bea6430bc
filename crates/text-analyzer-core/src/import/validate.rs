use std::path::Path;

use thiserror::Error;

/// Largest file accepted for analysis (5 MiB, inclusive).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// A file offered for import by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    /// Bare file name (no directory components).
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: bare_name(name),
            size: bytes.len() as u64,
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk.
    ///
    /// Oversized files are not read; only their declared size is kept so
    /// validation can reject them without loading the content.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = if size > MAX_FILE_SIZE {
            Vec::new()
        } else {
            std::fs::read(path)?
        };
        Ok(Self {
            name,
            size,
            mime: None,
            bytes,
        })
    }
}

fn bare_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Reasons a file is refused before any analysis call is made.
///
/// The `Display` text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File size exceeds 5MB.")]
    TooLarge { size: u64, max: u64 },
    #[error("Unsupported file type: {filename}. Supported file is only .TXT")]
    UnsupportedType { filename: String },
    #[error("{filename} is not valid UTF-8 text.")]
    NotUtf8 { filename: String },
    #[error("{filename} is empty.")]
    Empty { filename: String },
}

/// A file that passed validation, with its content decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub filename: String,
    pub content: String,
    pub size: u64,
}

/// Check size, then type, then content.
pub fn validate(file: IncomingFile) -> Result<AcceptedFile, ValidationError> {
    if file.size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge {
            size: file.size,
            max: MAX_FILE_SIZE,
        });
    }
    if !is_plain_text(&file.name, file.mime.as_deref()) {
        return Err(ValidationError::UnsupportedType {
            filename: file.name,
        });
    }
    let content = match String::from_utf8(file.bytes) {
        Ok(content) => content,
        Err(_) => {
            return Err(ValidationError::NotUtf8 {
                filename: file.name,
            });
        }
    };
    if content.is_empty() {
        return Err(ValidationError::Empty {
            filename: file.name,
        });
    }
    Ok(AcceptedFile {
        filename: file.name,
        size: file.size,
        content,
    })
}

/// `.txt` (any case) is accepted; a name without an extension is accepted
/// only when the mime type says `text/plain`.
pub fn is_plain_text(name: &str, mime: Option<&str>) -> bool {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("txt"),
        None => mime
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().eq_ignore_ascii_case("text/plain"))
            .unwrap_or(false),
    }
}
