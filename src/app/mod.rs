//! Application layer: the hexagonal core and its port boundary.
//!
//! [`service::OvenService`] owns the mode controller, input aggregator, lid
//! monitor, and indicator policy; everything it touches in the outside world
//! goes through the traits in [`ports`].

pub mod events;
pub mod ports;
pub mod service;
