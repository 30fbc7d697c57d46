#![allow(dead_code)]

use async_trait::async_trait;
use escrow_reconciler::application::reconciler::{PaymentReconciler, ReconcilerPorts};
use escrow_reconciler::config::ReconcilerConfig;
use escrow_reconciler::domain::gateway::{CheckoutSession, GatewayCallback, GatewayOutcome};
use escrow_reconciler::domain::notice::PaymentNotice;
use escrow_reconciler::domain::payment::{PaymentRecord, PaymentStatus};
use escrow_reconciler::domain::ports::{
    ActionAck, CreateOrderRequest, CreatedOrder, EscrowApi, Notifier, PaymentGateway,
    StatusCheck,
};
use escrow_reconciler::error::{ReconcileError, Result};
use escrow_reconciler::infrastructure::in_memory::{InMemoryPaymentCache, InMemorySessionMarkers};
use escrow_reconciler::infrastructure::scheduler::RecordingScheduler;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the fake backend answers `check_status` for one payment id.
#[derive(Debug, Clone)]
pub enum StatusReply {
    Check(StatusCheck),
    NotFound,
    NetworkDown,
}

#[derive(Debug, Default)]
pub struct ApiCalls {
    pub create_order: AtomicUsize,
    pub verify_payment: AtomicUsize,
    pub status_by_request: AtomicUsize,
    pub check_status: AtomicUsize,
    pub confirm_release: AtomicUsize,
}

impl ApiCalls {
    pub fn total(&self) -> usize {
        self.create_order.load(Ordering::SeqCst)
            + self.verify_payment.load(Ordering::SeqCst)
            + self.status_by_request.load(Ordering::SeqCst)
            + self.check_status.load(Ordering::SeqCst)
            + self.confirm_release.load(Ordering::SeqCst)
    }
}

/// Backend fake answering from canned replies and counting every call.
#[derive(Clone, Default)]
pub struct ScriptedEscrowApi {
    pub calls: Arc<ApiCalls>,
    pub by_request: Arc<Mutex<HashMap<String, PaymentRecord>>>,
    pub statuses: Arc<Mutex<HashMap<String, StatusReply>>>,
    /// Orders handed out in turn; the last one repeats.
    pub created: Arc<Mutex<VecDeque<CreatedOrder>>>,
    pub verify_ack: Arc<Mutex<ActionAck>>,
    pub release_ack: Arc<Mutex<ActionAck>>,
    pub orders: Arc<Mutex<Vec<CreateOrderRequest>>>,
    /// Holds `confirm_release` open for this long, to overlap calls.
    pub release_delay: Duration,
}

impl ScriptedEscrowApi {
    pub fn new() -> Self {
        Self {
            verify_ack: Arc::new(Mutex::new(ActionAck {
                success: true,
                simulation: false,
                message: None,
            })),
            release_ack: Arc::new(Mutex::new(ActionAck {
                success: true,
                simulation: false,
                message: None,
            })),
            ..Self::default()
        }
    }

    pub fn with_request(self, record: PaymentRecord) -> Self {
        self.by_request
            .lock()
            .unwrap()
            .insert(record.request_id.clone(), record);
        self
    }

    pub fn with_status(self, payment_id: &str, reply: StatusReply) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(payment_id.to_string(), reply);
        self
    }

    pub fn with_created(self, order: CreatedOrder) -> Self {
        self.created.lock().unwrap().push_back(order);
        self
    }

    pub fn with_release_ack(self, ack: ActionAck) -> Self {
        *self.release_ack.lock().unwrap() = ack;
        self
    }

    pub fn with_verify_ack(self, ack: ActionAck) -> Self {
        *self.verify_ack.lock().unwrap() = ack;
        self
    }

    pub fn with_release_delay(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }

    pub fn set_status(&self, payment_id: &str, reply: StatusReply) {
        self.statuses
            .lock()
            .unwrap()
            .insert(payment_id.to_string(), reply);
    }
}

#[async_trait]
impl EscrowApi for ScriptedEscrowApi {
    async fn create_order(&self, order: &CreateOrderRequest) -> Result<CreatedOrder> {
        self.calls.create_order.fetch_add(1, Ordering::SeqCst);
        self.orders.lock().unwrap().push(order.clone());
        let mut created = self.created.lock().unwrap();
        let next = if created.len() > 1 {
            created.pop_front()
        } else {
            created.front().cloned()
        };
        next.ok_or(ReconcileError::Api {
            status: Some(500),
            message: "Failed to create payment order".to_string(),
        })
    }

    async fn verify_payment(&self, _callback: &GatewayCallback) -> Result<ActionAck> {
        self.calls.verify_payment.fetch_add(1, Ordering::SeqCst);
        Ok(self.verify_ack.lock().unwrap().clone())
    }

    async fn status_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>> {
        self.calls.status_by_request.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_request.lock().unwrap().get(request_id).cloned())
    }

    async fn check_status(&self, payment_id: &str) -> Result<StatusCheck> {
        self.calls.check_status.fetch_add(1, Ordering::SeqCst);
        let reply = self.statuses.lock().unwrap().get(payment_id).cloned();
        match reply {
            Some(StatusReply::Check(check)) => Ok(check),
            Some(StatusReply::NetworkDown) => Err(ReconcileError::Api {
                status: None,
                message: "connection refused".to_string(),
            }),
            Some(StatusReply::NotFound) | None => {
                Err(ReconcileError::NotFound(format!("payment {}", payment_id)))
            }
        }
    }

    async fn confirm_release(&self, _payment_id: &str) -> Result<ActionAck> {
        self.calls.confirm_release.fetch_add(1, Ordering::SeqCst);
        if !self.release_delay.is_zero() {
            tokio::time::sleep(self.release_delay).await;
        }
        Ok(self.release_ack.lock().unwrap().clone())
    }
}

/// Gateway fake with a fixed load result; checkout outcomes are handed out in
/// turn and the last one repeats.
#[derive(Clone)]
pub struct ScriptedGateway {
    pub loads: bool,
    pub outcomes: Arc<Mutex<VecDeque<GatewayOutcome>>>,
    pub sessions: Arc<Mutex<Vec<CheckoutSession>>>,
}

impl ScriptedGateway {
    pub fn new(outcome: GatewayOutcome) -> Self {
        Self::sequence(vec![outcome])
    }

    pub fn sequence(outcomes: Vec<GatewayOutcome>) -> Self {
        Self {
            loads: true,
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            sessions: Arc::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            loads: false,
            ..Self::new(GatewayOutcome::Redirected)
        }
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn load(&self) -> bool {
        self.loads
    }

    async fn open_checkout(&self, session: &CheckoutSession) -> Result<GatewayOutcome> {
        self.sessions.lock().unwrap().push(session.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        let next = if outcomes.len() > 1 {
            outcomes.pop_front()
        } else {
            outcomes.front().cloned()
        };
        Ok(next.unwrap_or(GatewayOutcome::Redirected))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub notices: Arc<Mutex<Vec<PaymentNotice>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: PaymentNotice) -> Result<()> {
        self.notices.lock().unwrap().push(notice);
        Ok(())
    }
}

#[derive(Clone, Copy, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notice: PaymentNotice) -> Result<()> {
        Err(ReconcileError::Api {
            status: Some(503),
            message: "mail relay unavailable".to_string(),
        })
    }
}

/// Shared handles to the fakes behind one reconciler, so a test can build a
/// second reconciler over the same cache and markers to simulate a reload.
#[derive(Clone)]
pub struct Harness {
    pub cache: InMemoryPaymentCache,
    pub markers: InMemorySessionMarkers,
    pub api: ScriptedEscrowApi,
    pub gateway: ScriptedGateway,
    pub notifier: RecordingNotifier,
    pub scheduler: RecordingScheduler,
}

impl Harness {
    pub fn new(api: ScriptedEscrowApi) -> Self {
        Self {
            cache: InMemoryPaymentCache::new(),
            markers: InMemorySessionMarkers::new(),
            api,
            gateway: ScriptedGateway::new(GatewayOutcome::Redirected),
            notifier: RecordingNotifier::default(),
            scheduler: RecordingScheduler::new(),
        }
    }

    pub fn with_gateway(mut self, gateway: ScriptedGateway) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn ports(&self) -> ReconcilerPorts {
        ReconcilerPorts {
            cache: Box::new(self.cache.clone()),
            markers: Box::new(self.markers.clone()),
            api: Box::new(self.api.clone()),
            gateway: Box::new(self.gateway.clone()),
            notifier: Box::new(self.notifier.clone()),
            scheduler: Box::new(self.scheduler.clone()),
        }
    }

    pub fn reconciler(&self, request_id: &str) -> PaymentReconciler {
        PaymentReconciler::new(request_id, self.ports(), ReconcilerConfig::default())
    }
}

pub fn record(id: &str, request_id: &str, status: PaymentStatus) -> PaymentRecord {
    let mut record = PaymentRecord::pending(id, request_id, 32_450, format!("order_{}", id));
    if status >= PaymentStatus::Escrowed {
        record.status = PaymentStatus::Escrowed;
        record.gateway_payment_id = Some(format!("gw_{}", id));
    }
    if status == PaymentStatus::Completed {
        record.status = PaymentStatus::Completed;
        record.completed_at = Some(chrono::Utc::now());
    }
    record
}

pub fn check(payment: Option<PaymentRecord>) -> StatusReply {
    StatusReply::Check(StatusCheck {
        success: true,
        payment,
        simulation: false,
        message: None,
    })
}

pub fn created_order(payment_id: &str) -> CreatedOrder {
    CreatedOrder {
        order_id: format!("order_{}", payment_id),
        key_id: "rzp_test_key".to_string(),
        amount_paise: 3_245_000,
        currency: "INR".to_string(),
        payment_id: payment_id.to_string(),
    }
}

/// Starts a fake escrow backend on an ephemeral port and returns its base URL.
///
/// Knows `req_1`/`pay_1` (held in escrow), `pay_pending` (not yet captured) and
/// answers 404 for anything else.
pub async fn spawn_backend() -> String {
    use axum::Router;
    use axum::routing::{get, post};

    let app = Router::new()
        .route("/api/escrow/create-order", post(backend::create_order))
        .route("/api/escrow/verify-payment", post(backend::verify_payment))
        .route("/api/escrow/confirm", post(backend::confirm))
        .route("/api/escrow/check-status/:payment_id", post(backend::check_status))
        .route("/api/escrow/:request_id/status", get(backend::request_status))
        .route("/api/email/payment/success", post(backend::email))
        .route("/api/email/payment/released", post(backend::email));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

mod backend {
    use axum::Json;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    type Reply = (StatusCode, Json<Value>);

    fn escrowed_payment() -> Value {
        json!({
            "id": "pay_1",
            "request_id": "req_1",
            "status": "held",
            "amount": 32450.0,
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "gw_1"
        })
    }

    fn not_found(detail: &str) -> Reply {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": detail })))
    }

    pub async fn create_order(Json(body): Json<Value>) -> Reply {
        let amount = body["amount"].as_u64().unwrap_or(0);
        if amount == 0 {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": [{
                    "type": "value_error",
                    "loc": ["body", "amount"],
                    "msg": "amount must be positive"
                }]})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "order_id": "order_1",
                "key_id": "rzp_test_key",
                "amount_paise": amount * 100,
                "payment_id": "pay_1"
            })),
        )
    }

    pub async fn verify_payment(Json(body): Json<Value>) -> Reply {
        if body["razorpay_signature"] == "valid" {
            (StatusCode::OK, Json(json!({ "success": true })))
        } else {
            (
                StatusCode::OK,
                Json(json!({ "success": false, "message": "Invalid payment signature" })),
            )
        }
    }

    pub async fn request_status(Path(request_id): Path<String>) -> Reply {
        match request_id.as_str() {
            "req_1" => (
                StatusCode::OK,
                Json(json!({ "success": true, "payment": escrowed_payment() })),
            ),
            _ => not_found("No payment for this request"),
        }
    }

    pub async fn check_status(Path(payment_id): Path<String>) -> Reply {
        match payment_id.as_str() {
            "pay_1" => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "simulation": false,
                    "payment": escrowed_payment()
                })),
            ),
            "pay_pending" => (
                StatusCode::OK,
                Json(json!({ "success": false, "message": "Payment not completed" })),
            ),
            _ => not_found("Payment not found"),
        }
    }

    pub async fn confirm(Json(body): Json<Value>) -> Reply {
        if body["payment_id"] == "pay_1" {
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "simulation": true,
                    "message": "Payment released (simulated)"
                })),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Payment is not held in escrow" })),
            )
        }
    }

    pub async fn email() -> Reply {
        (StatusCode::OK, Json(json!({ "success": true })))
    }
}
