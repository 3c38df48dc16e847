use std::fmt;

use crate::session::{
    resolve_current_file, Dimensions, EditOperation, PendingMutation, SessionState,
};

pub fn processing_message(pending: PendingMutation) -> &'static str {
    match pending {
        PendingMutation::Edit(EditOperation::RotateLeft | EditOperation::RotateRight) => {
            "Rotating..."
        }
        PendingMutation::Reset => "Resetting...",
    }
}

/// The editor's info panel. `None` before anything is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub original_name: String,
    pub current_filename: String,
    pub edit_count: usize,
    pub dimensions: Option<Dimensions>,
    pub overlay: Option<&'static str>,
}

impl SessionView {
    pub fn project(state: &SessionState) -> Option<Self> {
        let file = state.current_file()?;
        Some(Self {
            original_name: file.original_name.clone(),
            current_filename: resolve_current_file(state)
                .unwrap_or(file.filename.as_str())
                .to_string(),
            edit_count: state.history().count(),
            dimensions: state.dimensions(),
            overlay: state.pending().map(processing_message),
        })
    }

    pub fn status_suffix(&self) -> Option<String> {
        match self.edit_count {
            0 => None,
            1 => Some("(edited once)".to_string()),
            n => Some(format!("(edited {n} times)")),
        }
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File:    {}", self.original_name)?;
        if let Some(suffix) = self.status_suffix() {
            write!(f, " {suffix}")?;
        }
        writeln!(f)?;
        match self.dimensions {
            Some(dimensions) => writeln!(f, "Size:    {dimensions}")?,
            None => writeln!(f, "Size:    unknown")?,
        }
        writeln!(f, "Current: {}", self.current_filename)?;
        write!(f, "Edits:   {}", self.edit_count)?;
        if let Some(overlay) = self.overlay {
            write!(f, "\n{overlay}")?;
        }
        Ok(())
    }
}
