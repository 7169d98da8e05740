//! State machine module root.

pub mod machine;

pub use machine::{SupervisorEvents, SupervisorStateMachine, Transition, next_state};
