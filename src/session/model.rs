use std::fmt;

use serde::{Deserialize, Serialize};

use super::history::EditHistory;
use crate::state::{SessionPhase, StateMachine};

/// The server's record of one upload. Replaced only by a newer upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub original_name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOperation {
    RotateLeft,
    RotateRight,
}

impl EditOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RotateLeft => "rotate_left",
            Self::RotateRight => "rotate_right",
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One server-confirmed edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub operation: EditOperation,
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}px", self.width, self.height)
    }
}

/// Successful `/edit` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedImage {
    pub filename: String,
    pub url: String,
    pub dimensions: Dimensions,
}

/// Successful `/reset` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetImage {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMutation {
    Edit(EditOperation),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub file_name: String,
}

/// Everything a front end needs to draw the editor.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(super) current_file: Option<UploadedFile>,
    pub(super) history: EditHistory,
    pub(super) machine: StateMachine,
    pub(super) pending: Option<PendingMutation>,
    pub(super) original_dimensions: Option<Dimensions>,
    pub(super) dimensions: Option<Dimensions>,
}

impl SessionState {
    pub fn current_file(&self) -> Option<&UploadedFile> {
        self.current_file.as_ref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn phase(&self) -> SessionPhase {
        self.machine.state()
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == SessionPhase::Busy
    }

    pub fn pending(&self) -> Option<PendingMutation> {
        self.pending
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }
}
