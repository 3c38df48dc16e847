use crate::upload::{CandidateFile, UploadPolicy, UploadRejection};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Files picked for a multi-file gallery upload, already filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedBatch {
    accepted: Vec<CandidateFile>,
    warnings: Vec<String>,
}

impl StagedBatch {
    pub fn accepted(&self) -> &[CandidateFile] {
        &self.accepted
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// `None` hides the upload button.
    pub fn upload_label(&self) -> Option<String> {
        match self.accepted.len() {
            0 => None,
            1 => Some("Upload 1 file".to_string()),
            n => Some(format!("Upload {n} files")),
        }
    }
}

/// A new selection replaces whatever was staged before.
pub fn stage_files<I>(policy: &UploadPolicy, files: I) -> StagedBatch
where
    I: IntoIterator<Item = CandidateFile>,
{
    let mut batch = StagedBatch::default();
    for file in files {
        match policy.validate(&file) {
            Ok(()) => batch.accepted.push(file),
            Err(rejection) => {
                tracing::debug!(name = %file.name, %rejection, "file left out of batch");
                batch.warnings.push(staging_warning(&file.name, &rejection));
            }
        }
    }
    batch
}

fn staging_warning(name: &str, rejection: &UploadRejection) -> String {
    match rejection {
        UploadRejection::UnsupportedType { .. } => format!("{name} is not a supported file type"),
        UploadRejection::FileTooLarge { limit, .. } => {
            format!("{name} is larger than {}", format_file_size(*limit))
        }
    }
}

/// Base-1024 size with at most two decimals, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
