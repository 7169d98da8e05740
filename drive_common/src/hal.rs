//! Hardware collaborator contracts.
//!
//! The supervisor never touches peripheral registers. It talks to the CAN
//! controller, the ADC multiplexer and the contactor coil outputs through
//! the traits in [`driver`], so the whole control loop runs unchanged on
//! target drivers or on the in-memory simulation.

pub mod driver;
