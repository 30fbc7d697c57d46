//! Client-side reconciliation of escrow payments for a creative-services marketplace.
//!
//! The [`application::reconciler::PaymentReconciler`] keeps a four-step checkout
//! (Pay, Verify, Release, Done) consistent with the backend's record of a payment,
//! a local cache, and the return path of an external payment gateway.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
