use crate::error::{ReconcileError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle of an escrow payment as seen by the client.
///
/// Transitions only move forward: `Pending -> Escrowed -> Completed`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Escrowed,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Escrowed => "escrowed",
            PaymentStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    /// Maps a backend status string onto the canonical enumeration.
    ///
    /// Several screens of the marketplace use their own names for the same state;
    /// anything unrecognised is treated as still awaiting verification.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "created" | "initiated" | "accepted" => PaymentStatus::Pending,
            "escrowed" | "paid" | "held" => PaymentStatus::Escrowed,
            "completed" | "released" => PaymentStatus::Completed,
            other => {
                tracing::warn!(status = other, "unknown payment status, treating as pending");
                PaymentStatus::Pending
            }
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-visible projection of an escrow payment.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    /// Identifier assigned by the backend at order creation.
    pub id: String,
    /// The service request being paid for.
    pub request_id: String,
    pub status: PaymentStatus,
    /// Integral amount in major currency units.
    #[serde(default, deserialize_with = "deserialize_major_units")]
    pub amount: u64,
    #[serde(default, alias = "razorpay_order_id")]
    pub gateway_order_id: Option<String>,
    #[serde(default, alias = "razorpay_payment_id", alias = "transaction_id")]
    pub gateway_payment_id: Option<String>,
    /// Set only once the payment reaches `Completed`.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// A freshly created order that has not been paid yet.
    pub fn pending(
        id: impl Into<String>,
        request_id: impl Into<String>,
        amount: u64,
        gateway_order_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            request_id: request_id.into(),
            status: PaymentStatus::Pending,
            amount,
            gateway_order_id: Some(gateway_order_id.into()),
            gateway_payment_id: None,
            completed_at: None,
        }
    }

    /// Marks the funds as held in escrow. Idempotent when already escrowed.
    pub fn mark_escrowed(&mut self, gateway_payment_id: Option<String>) -> Result<()> {
        self.advance(PaymentStatus::Escrowed)?;
        if gateway_payment_id.is_some() {
            self.gateway_payment_id = gateway_payment_id;
        }
        Ok(())
    }

    /// Marks the funds as released to the creator.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.status == PaymentStatus::Pending {
            return Err(ReconcileError::InvalidTransition {
                from: self.status.as_str(),
                to: PaymentStatus::Completed.as_str(),
            });
        }
        self.advance(PaymentStatus::Completed)?;
        if self.completed_at.is_none() {
            self.completed_at = Some(at);
        }
        Ok(())
    }

    fn advance(&mut self, to: PaymentStatus) -> Result<()> {
        if to < self.status {
            return Err(ReconcileError::InvalidTransition {
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }
}

fn deserialize_major_units<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Units {
        Integer(u64),
        Float(f64),
    }

    match Units::deserialize(deserializer)? {
        Units::Integer(value) => Ok(value),
        Units::Float(value) if value.is_finite() && value >= 0.0 => Ok(value.round() as u64),
        Units::Float(value) => Err(serde::de::Error::custom(format!(
            "invalid amount: {}",
            value
        ))),
    }
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
            .ok()
    }))
}
