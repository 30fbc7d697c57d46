//! Domain model of a client-side escrow payment and the ports the reconciler talks to.

pub mod gateway;
pub mod notice;
pub mod payment;
pub mod ports;
pub mod quote;
pub mod step;
