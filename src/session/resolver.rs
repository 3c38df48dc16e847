//! The one place that decides which server-side file the next action targets.

use super::model::{DownloadTarget, SessionState};

const EDITED_PREFIX: &str = "edited_";

/// Latest edit's filename, else the uploaded file's; `None` before any upload.
pub fn resolve_current_file(state: &SessionState) -> Option<&str> {
    let file = state.current_file()?;
    Some(
        state
            .history()
            .latest()
            .map_or(file.filename.as_str(), |record| record.filename.as_str()),
    )
}

pub fn resolve_download_target(state: &SessionState) -> Option<DownloadTarget> {
    let file = state.current_file()?;
    let target = match state.history().latest() {
        Some(latest) => DownloadTarget {
            url: latest.url.clone(),
            file_name: format!("{EDITED_PREFIX}{}", file.original_name),
        },
        None => DownloadTarget {
            url: file.url.clone(),
            file_name: file.original_name.clone(),
        },
    };
    Some(target)
}
