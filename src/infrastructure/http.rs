use crate::config::ReconcilerConfig;
use crate::domain::gateway::GatewayCallback;
use crate::domain::notice::PaymentNotice;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{
    ActionAck, CreateOrderRequest, CreatedOrder, EscrowApi, Notifier, StatusCheck,
};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

const GENERIC_ERROR: &str = "An unknown error occurred";

/// Escrow endpoints of the marketplace backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEscrowApi {
    base_url: String,
    client: Client,
}

impl HttpEscrowApi {
    pub fn new(config: &ReconcilerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    order_id: Option<String>,
    key_id: Option<String>,
    amount_paise: Option<u64>,
    currency: Option<String>,
    payment_id: Option<String>,
}

impl CreateOrderResponse {
    fn into_order(self) -> Result<CreatedOrder> {
        let failure = |message: Option<String>| ReconcileError::Api {
            status: None,
            message: message.unwrap_or_else(|| "Failed to create payment order".to_string()),
        };
        if !self.success {
            return Err(failure(self.message));
        }
        match (
            self.order_id,
            self.key_id,
            self.amount_paise,
            self.payment_id,
        ) {
            (Some(order_id), Some(key_id), Some(amount_paise), Some(payment_id)) => {
                Ok(CreatedOrder {
                    order_id,
                    key_id,
                    amount_paise,
                    currency: self.currency.unwrap_or_else(|| "INR".to_string()),
                    payment_id,
                })
            }
            _ => Err(failure(Some(
                "Escrow order response is missing fields".to_string(),
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RequestStatusResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    payment: Option<PaymentRecord>,
}

#[async_trait]
impl EscrowApi for HttpEscrowApi {
    async fn create_order(&self, order: &CreateOrderRequest) -> Result<CreatedOrder> {
        debug!(request_id = %order.request_id, amount = order.amount, "creating escrow order");
        let response = self
            .client
            .post(self.url("/api/escrow/create-order"))
            .json(order)
            .send()
            .await?;
        let body: CreateOrderResponse = decode(response, "escrow order").await?;
        body.into_order()
    }

    async fn verify_payment(&self, callback: &GatewayCallback) -> Result<ActionAck> {
        let response = self
            .client
            .post(self.url("/api/escrow/verify-payment"))
            .json(callback)
            .send()
            .await?;
        decode(response, "payment").await
    }

    async fn status_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>> {
        let response = self
            .client
            .get(self.url(&format!("/api/escrow/{}/status", request_id)))
            .send()
            .await?;
        match decode::<RequestStatusResponse>(response, "payment").await {
            Ok(body) if body.success => Ok(body.payment),
            Ok(_) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn check_status(&self, payment_id: &str) -> Result<StatusCheck> {
        let response = self
            .client
            .post(self.url(&format!("/api/escrow/check-status/{}", payment_id)))
            .send()
            .await?;
        decode(response, &format!("payment {}", payment_id)).await
    }

    async fn confirm_release(&self, payment_id: &str) -> Result<ActionAck> {
        let response = self
            .client
            .post(self.url("/api/escrow/confirm"))
            .json(&serde_json::json!({ "payment_id": payment_id }))
            .send()
            .await?;
        decode(response, &format!("payment {}", payment_id)).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ReconcileError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "escrow backend returned an error");
        return Err(ReconcileError::Api {
            status: Some(status.as_u16()),
            message: extract_error_message(&body),
        });
    }
    Ok(response.json().await?)
}

/// Pulls a human-readable message out of a backend error body.
///
/// `detail` may be a string, a list of validation entries, or an object with `msg`.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            trimmed.to_string()
        };
    };

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(text) => text.clone(),
                other => other
                    .get("msg")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(detail) if detail.is_object() => detail
            .get("msg")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| detail.to_string()),
        Some(Value::Null) | None => value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_ERROR)
            .to_string(),
        Some(other) => other.to_string(),
    }
}

/// Sends payment emails through the backend's email routes.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    base_url: String,
    client: Client,
}

impl HttpNotifier {
    pub fn new(config: &ReconcilerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, notice: PaymentNotice) -> Result<()> {
        let request = match &notice {
            PaymentNotice::Escrowed(receipt) => self
                .client
                .post(format!("{}/api/email/payment/success", self.base_url))
                .json(receipt),
            PaymentNotice::Released(record) => self
                .client
                .post(format!("{}/api/email/payment/released", self.base_url))
                .json(record),
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReconcileError::Api {
                status: Some(status.as_u16()),
                message: extract_error_message(&body),
            });
        }
        Ok(())
    }
}
