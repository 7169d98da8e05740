//! Contactor request handling.

pub mod arbiter;
pub mod request;

pub use arbiter::{ArbiterStats, ContactorArbiter};
pub use request::RequestSlot;
