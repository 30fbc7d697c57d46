//! Application layer orchestrating the escrow checkout.
//!
//! `PaymentReconciler` owns the ports for one service request and keeps the wizard
//! step consistent with the backend's view of the payment.

pub mod reconciler;
