// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declaration Lifecycle State Machine
//!
//! # States
//!
//! - Planned: part of the plan, not yet sent to the provider
//! - Declaring: sent, waiting for the provider's answer
//! - Declared: accepted, handle known (terminal)
//! - Failed: rejected by the provider (terminal)
//! - Skipped: never sent because an earlier declaration failed (terminal)
//!
//! # Inputs
//!
//! - Begin: Planned → Declaring
//! - Succeed: Declaring → Declared
//! - Fail: Declaring → Failed
//! - Skip: Planned → Skipped

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Status of one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationStatus {
    Planned,
    Declaring,
    Declared,
    Failed,
    Skipped,
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planned => "planned",
            Self::Declaring => "declaring",
            Self::Declared => "declared",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Lifecycle input (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationInput {
    Begin,
    Succeed,
    Fail,
    Skip,
}

impl fmt::Display for DeclarationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl StateMachine for DeclarationStatus {
    type Input = DeclarationInput;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use DeclarationInput::*;
        use DeclarationStatus::*;

        match (self, input) {
            (Planned, Begin) => Ok((Declaring, ())),
            (Planned, Skip) => Ok((Skipped, ())),
            (Declaring, Succeed) => Ok((Declared, ())),
            (Declaring, Fail) => Ok((Failed, ())),

            (Declared | Failed | Skipped, _) => Err(TransitionError::Terminal(self.to_string())),

            (Planned, Succeed | Fail) | (Declaring, Begin | Skip) => {
                Err(TransitionError::InvalidTransition {
                    from: self.to_string(),
                    input: input.to_string(),
                })
            }
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeclarationStatus::Declared | DeclarationStatus::Failed | DeclarationStatus::Skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(DeclarationStatus::Planned, DeclarationInput::Begin => DeclarationStatus::Declaring)]
    #[test_case(DeclarationStatus::Planned, DeclarationInput::Skip => DeclarationStatus::Skipped)]
    #[test_case(DeclarationStatus::Declaring, DeclarationInput::Succeed => DeclarationStatus::Declared)]
    #[test_case(DeclarationStatus::Declaring, DeclarationInput::Fail => DeclarationStatus::Failed)]
    fn test_valid_transitions(from: DeclarationStatus, input: DeclarationInput) -> DeclarationStatus {
        from.transition(&input).unwrap().0
    }

    #[test]
    fn test_planned_cannot_complete_without_declaring() {
        let result = DeclarationStatus::Planned.transition(&DeclarationInput::Succeed);
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_terminal_states_reject_input() {
        for state in [
            DeclarationStatus::Declared,
            DeclarationStatus::Failed,
            DeclarationStatus::Skipped,
        ] {
            assert!(state.is_terminal());
            assert!(!state.can_transition(&DeclarationInput::Begin));
            assert_eq!(
                state.transition(&DeclarationInput::Skip),
                Err(TransitionError::Terminal(state.to_string()))
            );
        }
        assert!(!DeclarationStatus::Planned.is_terminal());
    }
}
