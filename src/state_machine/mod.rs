// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic state machine types for tracking the lifecycle of each planned
//! declaration. Transitions are pure functions; timestamps are supplied by
//! the caller.
//!
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_network_topology::state_machine::{
//!     DeclarationInput, DeclarationStatus, StateMachine,
//! };
//!
//! let (next, _) = DeclarationStatus::Planned
//!     .transition(&DeclarationInput::Begin)
//!     .unwrap();
//! assert_eq!(next, DeclarationStatus::Declaring);
//! ```

pub mod declaration_lifecycle;

pub use declaration_lifecycle::{DeclarationInput, DeclarationStatus};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state with the given input is not allowed
    #[error("Invalid transition from {from} on {input}")]
    InvalidTransition { from: String, input: String },

    /// Current state accepts no further input
    #[error("State {0} is terminal")]
    Terminal(String),
}

/// Trait for finite state machines
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Whether the state accepts no further input
    fn is_terminal(&self) -> bool;
}

/// Transition record for auditing
#[derive(Debug, Clone, Serialize)]
pub struct Transition<S, I> {
    pub from: S,
    pub to: S,
    pub input: I,
    pub timestamp: DateTime<Utc>,
}

/// State machine with history
///
/// Wraps a state machine and tracks transition history.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "FSM: Serialize, FSM::Input: Serialize"))]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    current: FSM,
    history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine> StateMachineWithHistory<FSM> {
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Transition with history recording
    ///
    /// The current state is left untouched when the transition is rejected.
    pub fn transition_with_history(
        &mut self,
        input: FSM::Input,
        timestamp: DateTime<Utc>,
    ) -> TransitionResult<FSM::Output> {
        let (to, output) = self.current.transition(&input)?;

        self.history.push(Transition {
            from: self.current.clone(),
            to: to.clone(),
            input,
            timestamp,
        });

        self.current = to;
        Ok(output)
    }

    pub fn history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    pub fn current_state(&self) -> &FSM {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Simple test FSM: On/Off switch
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    enum Switch {
        Off,
        On,
    }

    #[derive(Debug, Clone, Serialize)]
    enum SwitchInput {
        Press,
    }

    impl StateMachine for Switch {
        type Input = SwitchInput;
        type Output = ();

        fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
            match (self, input) {
                (Switch::Off, SwitchInput::Press) => Ok((Switch::On, ())),
                (Switch::On, SwitchInput::Press) => Ok((Switch::Off, ())),
            }
        }

        fn is_terminal(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_state_machine_with_history() {
        let mut fsm = StateMachineWithHistory::new(Switch::Off);

        fsm.transition_with_history(SwitchInput::Press, Utc::now())
            .unwrap();
        assert_eq!(*fsm.current_state(), Switch::On);
        assert_eq!(fsm.history().len(), 1);

        fsm.transition_with_history(SwitchInput::Press, Utc::now())
            .unwrap();
        assert_eq!(*fsm.current_state(), Switch::Off);
        assert_eq!(fsm.history().len(), 2);
        assert_eq!(fsm.history()[0].from, Switch::Off);
    }

    #[test]
    fn test_rejected_transition_keeps_state() {
        let mut fsm = StateMachineWithHistory::new(DeclarationStatus::Planned);
        let result = fsm.transition_with_history(DeclarationInput::Succeed, Utc::now());

        assert!(result.is_err());
        assert_eq!(*fsm.current_state(), DeclarationStatus::Planned);
        assert!(fsm.history().is_empty());
    }
}
