use super::model::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server confirmed a new upload.
    Uploaded,
    /// An edit or reset request is about to be sent.
    BeginMutation,
    /// The outstanding edit or reset came back, successfully or not.
    MutationSettled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<SessionPhase>,
    pub event: SessionEvent,
    pub to: SessionPhase,
}

impl StateTransition {
    pub const fn new(from: Option<SessionPhase>, event: SessionEvent, to: SessionPhase) -> Self {
        Self { from, event, to }
    }
}
