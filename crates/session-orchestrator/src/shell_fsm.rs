//! Shell lifecycle state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    Splashing    │ (initial)
//! └────────┬────────┘
//!          │ SplashElapsed
//!          ▼
//! ┌─────────────────┐  ManualLoginRequired   ┌─────────────────────┐
//! │CheckingAutoLogin│ ─────────────────────► │ AwaitingManualLogin │◄──┐
//! └────────┬────────┘                        └──────────┬──────────┘   │
//!          │ CredentialAuthorized    SignInRequested    │   SignInFailed
//!          │                                            ▼              │
//!          │                                 ┌─────────────────────┐   │
//!          │                                 │      SigningIn      │ ──┘
//!          │                                 └──────────┬──────────┘
//!          │                          SignInSucceeded   │
//!          ▼                                            ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        LoadingContent                        │◄──┐
//! └──────────────────────────────┬───────────────────────────────┘   │
//!                                │ EndSessionRequested               │ EndSessionFailed
//!                                ▼                                   │
//!                      ┌─────────────────────┐                       │
//!                      │    EndingSession    │ ──────────────────────┘
//!                      └──────────┬──────────┘
//!                                 │ SessionEnded
//!                                 ▼
//!                        AwaitingManualLogin
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub shell_machine(Splashing)

    Splashing => {
        SplashElapsed => CheckingAutoLogin
    },
    CheckingAutoLogin => {
        CredentialAuthorized => LoadingContent,
        ManualLoginRequired => AwaitingManualLogin
    },
    AwaitingManualLogin => {
        SignInRequested => SigningIn
    },
    SigningIn => {
        SignInSucceeded => LoadingContent,
        SignInFailed => AwaitingManualLogin
    },
    LoadingContent => {
        EndSessionRequested => EndingSession
    },
    EndingSession => {
        SessionEnded => AwaitingManualLogin,
        // Backend refused; the session is still valid
        EndSessionFailed => LoadingContent
    }
}

pub use shell_machine::Input as ShellMachineInput;
pub use shell_machine::State as ShellMachineState;
pub use shell_machine::StateMachine as ShellMachine;

/// Shell state as exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellState {
    /// Splash screen showing.
    Splashing,
    /// Looking at the cached identity.
    CheckingAutoLogin,
    /// Login screen showing.
    AwaitingManualLogin,
    /// Sign-in sheet or code exchange in flight.
    SigningIn,
    /// Web app showing.
    LoadingContent,
    /// Logout or account deletion in flight.
    EndingSession,
}

impl ShellState {
    /// The embedded web app should be on screen.
    pub fn shows_content(self) -> bool {
        matches!(self, ShellState::LoadingContent | ShellState::EndingSession)
    }

    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ShellState::Splashing
                | ShellState::CheckingAutoLogin
                | ShellState::SigningIn
                | ShellState::EndingSession
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShellState::Splashing => "splashing",
            ShellState::CheckingAutoLogin => "checking_auto_login",
            ShellState::AwaitingManualLogin => "awaiting_manual_login",
            ShellState::SigningIn => "signing_in",
            ShellState::LoadingContent => "loading_content",
            ShellState::EndingSession => "ending_session",
        }
    }
}

impl std::fmt::Display for ShellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ShellMachineState> for ShellState {
    fn from(state: &ShellMachineState) -> Self {
        match state {
            ShellMachineState::Splashing => ShellState::Splashing,
            ShellMachineState::CheckingAutoLogin => ShellState::CheckingAutoLogin,
            ShellMachineState::AwaitingManualLogin => ShellState::AwaitingManualLogin,
            ShellMachineState::SigningIn => ShellState::SigningIn,
            ShellMachineState::LoadingContent => ShellState::LoadingContent,
            ShellMachineState::EndingSession => ShellState::EndingSession,
        }
    }
}

/// Payload for shell state change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellStateChangedPayload {
    pub state: ShellState,
    /// Web app URL to load, present while content is showing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
