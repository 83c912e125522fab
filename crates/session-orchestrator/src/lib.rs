//! Session orchestration for the Sohwagi shell.
//!
//! This crate provides:
//! - The shell lifecycle FSM (splash, auto-login, manual login, content)
//! - `SessionOrchestrator`, which drives sign-in, code exchange, push token
//!   registration, logout and account deletion across the collaborators
//! - Routing of web app bridge messages

mod error;
mod orchestrator;
mod push;
mod shell_fsm;

pub use error::{AuthError, AuthResult};
pub use orchestrator::{
    Collaborators, OrchestratorSettings, SessionOrchestrator, ShellSnapshot, ShellStateCallback,
};
pub use shell_fsm::shell_machine;
pub use shell_fsm::{
    ShellMachine, ShellMachineInput, ShellMachineState, ShellState, ShellStateChangedPayload,
};
