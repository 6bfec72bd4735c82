//! Upload acceptance and the scratch record written for each accepted file.

use crate::config::AppConfig;
use crate::error::UploadRejected;
use crate::text_utils::title_from_filename;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use ts_rs::TS;

pub const MAX_FILES_PER_UPLOAD: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FileKind {
    Pdf,
    Epub,
    Txt,
    Mobi,
    Azw,
    Azw3,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "epub" => Some(Self::Epub),
            "txt" => Some(Self::Txt),
            "mobi" => Some(Self::Mobi),
            "azw" => Some(Self::Azw),
            "azw3" => Some(Self::Azw3),
            _ => None,
        }
    }

    /// Kindle formats are advertised in the picker but cannot be processed.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Pdf | Self::Epub | Self::Txt)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Epub => "application/epub+zip",
            Self::Txt => "text/plain",
            Self::Mobi | Self::Azw | Self::Azw3 => "application/x-mobipocket-ebook",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    pub path: PathBuf,
    pub kind: FileKind,
    pub file_name: String,
    pub title: String,
}

/// Validate one upload action: exactly one existing file of a supported type.
pub fn accept_upload(files: &[PathBuf]) -> Result<AcceptedUpload, UploadRejected> {
    if files.len() > MAX_FILES_PER_UPLOAD {
        return Err(UploadRejected::TooManyFiles { count: files.len() });
    }
    let Some(path) = files.first() else {
        return Err(UploadRejected::NoFile);
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_string();
    let kind = match FileKind::from_extension(&extension) {
        Some(kind) if kind.is_supported() => kind,
        Some(_) => {
            warn!(path = %path.display(), %extension, "Rejected advertised-only format");
            return Err(UploadRejected::NotYetSupported {
                path: path.clone(),
                extension,
            });
        }
        None => {
            return Err(UploadRejected::UnsupportedType {
                path: path.clone(),
                extension,
            });
        }
    };

    if !path.is_file() {
        return Err(UploadRejected::Missing(path.clone()));
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document")
        .to_string();
    let title = title_from_filename(&file_name);
    info!(
        path = %path.display(),
        kind = ?kind,
        mime = kind.mime_type(),
        %title,
        "Accepted upload"
    );
    Ok(AcceptedUpload {
        path: path.clone(),
        kind,
        file_name,
        title,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RecordStatus {
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadRecord {
    #[ts(type = "number")]
    pub id: u64,
    pub title: String,
    pub author: String,
    pub status: RecordStatus,
    pub progress: u8,
    pub category: String,
    #[ts(type = "number")]
    pub uploaded_at_unix_ms: u64,
}

impl UploadRecord {
    pub fn new(upload: &AcceptedUpload, config: &AppConfig, now_unix_ms: u64) -> Self {
        Self {
            id: now_unix_ms,
            title: upload.title.clone(),
            author: config.placeholder_author.clone(),
            status: RecordStatus::Processing,
            progress: 0,
            category: config.placeholder_category.clone(),
            uploaded_at_unix_ms: now_unix_ms,
        }
    }
}

pub fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// SHA-256 of the file contents, hex encoded.
pub fn content_digest(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
