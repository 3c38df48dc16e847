/// Lifecycle phase of one edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No file uploaded yet.
    #[default]
    Idle,
    /// A file is loaded; edits and resets may start.
    Ready,
    /// One edit or reset is outstanding.
    Busy,
}
