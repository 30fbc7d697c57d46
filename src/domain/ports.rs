use super::gateway::{CheckoutSession, GatewayCallback, GatewayOutcome, RedirectMarker};
use super::notice::PaymentNotice;
use super::payment::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local persistent mirror of payment records, keyed by payment id.
#[async_trait]
pub trait PaymentCache: Send + Sync {
    async fn get(&self, payment_id: &str) -> Result<Option<PaymentRecord>>;
    async fn put(&self, record: PaymentRecord) -> Result<()>;
    async fn delete(&self, payment_id: &str) -> Result<()>;
    async fn find_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>>;
    async fn all(&self) -> Result<Vec<PaymentRecord>>;
}

/// Storage for the one-shot redirect-return marker.
#[async_trait]
pub trait SessionMarkers: Send + Sync {
    async fn set_redirect(&self, marker: RedirectMarker) -> Result<()>;
    /// Reads and deletes the marker for a request.
    async fn take_redirect(&self, request_id: &str) -> Result<Option<RedirectMarker>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    pub client_id: String,
    pub creator_id: String,
    pub request_id: String,
    pub amount: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    pub key_id: String,
    pub amount_paise: u64,
    pub currency: String,
    pub payment_id: String,
}

/// Result of the authoritative status check for one payment id.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusCheck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub payment: Option<PaymentRecord>,
    #[serde(default)]
    pub simulation: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgement of verify and release calls.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub simulation: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend escrow endpoints.
///
/// `check_status` returns [`crate::error::ReconcileError::NotFound`] when the backend
/// has no record for the id; `status_by_request` reports that as `Ok(None)`.
#[async_trait]
pub trait EscrowApi: Send + Sync {
    async fn create_order(&self, order: &CreateOrderRequest) -> Result<CreatedOrder>;
    async fn verify_payment(&self, callback: &GatewayCallback) -> Result<ActionAck>;
    async fn status_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>>;
    async fn check_status(&self, payment_id: &str) -> Result<StatusCheck>;
    async fn confirm_release(&self, payment_id: &str) -> Result<ActionAck>;
}

/// Hosted checkout of the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Loads the checkout script; `false` when it cannot be loaded.
    async fn load(&self) -> bool;
    async fn open_checkout(&self, session: &CheckoutSession) -> Result<GatewayOutcome>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: PaymentNotice) -> Result<()>;
}

/// Delays a task; injected so tests can run without waiting.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub type PaymentCacheBox = Box<dyn PaymentCache>;
pub type SessionMarkersBox = Box<dyn SessionMarkers>;
pub type EscrowApiBox = Box<dyn EscrowApi>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type NotifierBox = Box<dyn Notifier>;
pub type SchedulerBox = Box<dyn Scheduler>;
