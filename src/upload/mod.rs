use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde::Deserialize;
use thiserror::Error;

/// Upload size ceiling shared by every profile (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

const EDITOR_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];
const GALLERY_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("file is {size} bytes; uploads are limited to {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("unsupported file type: {mime_type}")]
    UnsupportedType { mime_type: String },
}

pub type UploadResult<T> = std::result::Result<T, UploadRejection>;

/// Which front end the policy is for. The gallery does not take webp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadProfile {
    #[default]
    Editor,
    Gallery,
}

/// A local file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl CandidateFile {
    pub fn new(
        path: impl Into<PathBuf>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let name = file_display_name(&path);
        Self {
            path,
            name,
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Stats `path` and infers its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        Ok(Self::new(path, metadata.len(), mime_type_for_path(path)))
    }
}

pub fn mime_type_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

fn file_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_bytes: u64,
    accepted_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_bytes: u64, accepted_types: &[&str]) -> Self {
        Self {
            max_bytes,
            accepted_types: accepted_types.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    pub fn for_profile(profile: UploadProfile) -> Self {
        match profile {
            UploadProfile::Editor => Self::new(MAX_UPLOAD_BYTES, EDITOR_MIME_TYPES),
            UploadProfile::Gallery => Self::new(MAX_UPLOAD_BYTES, GALLERY_MIME_TYPES),
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn accepts_type(&self, mime_type: &str) -> bool {
        self.accepted_types.iter().any(|t| t == mime_type)
    }

    /// Size is checked before type; the first failing rule is reported.
    pub fn validate(&self, file: &CandidateFile) -> UploadResult<()> {
        if file.size > self.max_bytes {
            return Err(UploadRejection::FileTooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }
        if !self.accepts_type(&file.mime_type) {
            return Err(UploadRejection::UnsupportedType {
                mime_type: file.mime_type.clone(),
            });
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::for_profile(UploadProfile::default())
    }
}
