use serde::{Deserialize, Serialize};

/// Parameters handed to the hosted checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSession {
    pub key_id: String,
    pub order_id: String,
    /// Amount in minor units, as the gateway expects it.
    pub amount_minor: u64,
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    pub prefill_email: String,
}

/// Success callback delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayCallback {
    #[serde(rename = "razorpay_order_id")]
    pub order_id: String,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
}

/// How a checkout session ended from the client's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// The in-page handler fired with a signed payment.
    Success(GatewayCallback),
    /// The gateway reported a user-side failure, e.g. a declined card.
    Failed { reason: String },
    /// The client left for the gateway's own pages; the result arrives on return.
    Redirected,
}

/// One-shot flag stashed before leaving for the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectMarker {
    pub request_id: String,
    pub payment_id: String,
    #[serde(default)]
    pub gateway_payment_id: Option<String>,
}
