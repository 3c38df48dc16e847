use super::error::{StateError, StateResult};
use super::{event::StateTransition, SessionEvent, SessionPhase};

#[derive(Debug, Clone)]
pub struct StateMachine {
    state: SessionPhase,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionPhase::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionPhase {
        self.state
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SessionEvent) -> Option<SessionPhase> {
        use SessionEvent::*;
        match (self.state, event) {
            (_, Uploaded) => Some(SessionPhase::Ready),
            (SessionPhase::Ready, BeginMutation) => Some(SessionPhase::Busy),
            (SessionPhase::Busy, MutationSettled) => Some(SessionPhase::Ready),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionPhase> {
        tracing::debug!(from = ?self.state, event = ?event, "request session transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid session transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionPhase::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(SessionEvent::Uploaded));
        assert!(!machine.can_transition(SessionEvent::BeginMutation));
        assert!(!machine.can_transition(SessionEvent::MutationSettled));

        machine
            .transition(SessionEvent::Uploaded)
            .expect("idle -> ready should transition");

        assert!(machine.can_transition(SessionEvent::BeginMutation));
        assert!(!machine.can_transition(SessionEvent::MutationSettled));
    }

    #[test]
    fn busy_rejects_a_second_mutation() {
        let mut machine = StateMachine::new();
        machine.transition(SessionEvent::Uploaded).unwrap();
        machine.transition(SessionEvent::BeginMutation).unwrap();

        let err = machine
            .transition(SessionEvent::BeginMutation)
            .expect_err("busy -> begin mutation should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: SessionPhase::Busy,
                event: SessionEvent::BeginMutation
            }
        ));
        assert_eq!(machine.state(), SessionPhase::Busy);
    }

    #[test]
    fn upload_forces_ready_from_any_phase() {
        let mut machine = StateMachine::new();
        machine.transition(SessionEvent::Uploaded).unwrap();
        machine.transition(SessionEvent::BeginMutation).unwrap();

        assert_eq!(
            machine.transition(SessionEvent::Uploaded).unwrap(),
            SessionPhase::Ready
        );
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        machine.transition(SessionEvent::Uploaded).unwrap();
        machine.transition(SessionEvent::BeginMutation).unwrap();
        machine.transition(SessionEvent::MutationSettled).unwrap();

        assert_eq!(machine.state(), SessionPhase::Ready);
        assert_eq!(
            machine.history(),
            &[
                StateTransition::new(
                    Some(SessionPhase::Idle),
                    SessionEvent::Uploaded,
                    SessionPhase::Ready
                ),
                StateTransition::new(
                    Some(SessionPhase::Ready),
                    SessionEvent::BeginMutation,
                    SessionPhase::Busy
                ),
                StateTransition::new(
                    Some(SessionPhase::Busy),
                    SessionEvent::MutationSettled,
                    SessionPhase::Ready
                ),
            ]
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(SessionEvent::MutationSettled)
            .expect_err("idle -> settled should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: SessionPhase::Idle,
                event: SessionEvent::MutationSettled
            }
        ));
        assert_eq!(machine.state(), SessionPhase::Idle);
        assert!(machine.history().is_empty());
    }
}
