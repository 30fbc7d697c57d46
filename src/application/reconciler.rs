use crate::config::ReconcilerConfig;
use crate::domain::gateway::{CheckoutSession, GatewayCallback, GatewayOutcome, RedirectMarker};
use crate::domain::notice::{PaymentNotice, PaymentReceipt, format_rupees};
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::domain::ports::{
    CreateOrderRequest, EscrowApiBox, NotifierBox, PaymentCacheBox, PaymentGatewayBox,
    SchedulerBox, SessionMarkersBox,
};
use crate::domain::quote::OrderDetails;
use crate::domain::step::{StepAction, WizardStep};
use crate::error::{ReconcileError, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Adapters the reconciler runs against.
pub struct ReconcilerPorts {
    pub cache: PaymentCacheBox,
    pub markers: SessionMarkersBox,
    pub api: EscrowApiBox,
    pub gateway: PaymentGatewayBox,
    pub notifier: NotifierBox,
    pub scheduler: SchedulerBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

/// Inline message shown above the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

/// Snapshot of what the checkout should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcilerView {
    pub request_id: String,
    pub step: WizardStep,
    pub payment_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub banner: Option<Banner>,
    pub simulation: bool,
    pub paying: bool,
    pub verifying: bool,
    pub releasing: bool,
    pub actions: Vec<StepAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayOutcome {
    /// The in-page callback fired and the backend verified the payment.
    Escrowed(ReconcilerView),
    /// The client must finish on the gateway's pages and come back.
    Redirected(CheckoutSession),
}

#[derive(Debug, Clone)]
struct CheckoutContext {
    order: OrderDetails,
    client_id: String,
}

#[derive(Debug, Default)]
struct SessionState {
    step: WizardStep,
    payment_id: Option<String>,
    gateway_payment_id: Option<String>,
    banner: Option<Banner>,
    simulation: bool,
    checkout: Option<CheckoutContext>,
}

impl SessionState {
    /// Once released, nothing in the same session moves the step back.
    fn set_step(&mut self, step: WizardStep) {
        if self.step.is_terminal() && step < self.step {
            warn!(from = %self.step, to = %step, "ignoring step regression after release");
            return;
        }
        self.step = step;
    }

    fn adopt(&mut self, record: &PaymentRecord) {
        self.payment_id = Some(record.id.clone());
        if record.gateway_payment_id.is_some() {
            self.gateway_payment_id = record.gateway_payment_id.clone();
        }
        self.set_step(WizardStep::for_status(record.status));
    }

    fn clear_payment(&mut self) {
        self.payment_id = None;
        self.gateway_payment_id = None;
        self.set_step(WizardStep::Pay);
    }
}

/// Marks one action as in flight for as long as the guard lives.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn begin(flag: &'a AtomicBool, action: &'static str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReconcileError::ActionInFlight(action))?;
        Ok(Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side view of the escrow payment for a single service request.
///
/// `PaymentReconciler` derives the checkout step from the backend's record, keeps the
/// local cache in line with it, and drives the pay, verify and release actions. Each
/// action is guarded so a second call while the first is in flight is rejected.
pub struct PaymentReconciler {
    request_id: String,
    config: ReconcilerConfig,
    ports: ReconcilerPorts,
    state: Mutex<SessionState>,
    paying: AtomicBool,
    verifying: AtomicBool,
    releasing: AtomicBool,
}

impl PaymentReconciler {
    pub fn new(
        request_id: impl Into<String>,
        ports: ReconcilerPorts,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            config,
            ports,
            state: Mutex::new(SessionState::default()),
            paying: AtomicBool::new(false),
            verifying: AtomicBool::new(false),
            releasing: AtomicBool::new(false),
        }
    }

    pub async fn view(&self) -> ReconcilerView {
        let state = self.state.lock().await;
        ReconcilerView {
            request_id: self.request_id.clone(),
            step: state.step,
            payment_id: state.payment_id.clone(),
            gateway_payment_id: state.gateway_payment_id.clone(),
            banner: state.banner.clone(),
            simulation: state.simulation,
            paying: self.paying.load(Ordering::Acquire),
            verifying: self.verifying.load(Ordering::Acquire),
            releasing: self.releasing.load(Ordering::Acquire),
            actions: state.step.action().into_iter().collect(),
        }
    }

    /// Startup reconciliation. Runs once per load, before the active step is shown.
    ///
    /// Failures here never surface as errors: the worst case keeps the last-known
    /// local state so a flaky network does not send the client back to step one.
    pub async fn reconcile_on_load(&self) -> ReconcilerView {
        if let Some(candidate) = self.find_candidate().await {
            self.sync_with_backend(candidate).await;
        }
        self.resume_after_redirect().await;
        self.view().await
    }

    async fn find_candidate(&self) -> Option<PaymentRecord> {
        match self.ports.cache.find_by_request(&self.request_id).await {
            Ok(Some(record)) => {
                debug!(request_id = %self.request_id, payment_id = %record.id, "found cached payment");
                return Some(record);
            }
            Ok(None) => {}
            Err(e) => warn!(request_id = %self.request_id, error = %e, "payment cache lookup failed"),
        }

        match self.ports.api.status_by_request(&self.request_id).await {
            Ok(Some(record)) => {
                info!(request_id = %self.request_id, payment_id = %record.id, "adopting payment from backend");
                self.cache_put(record.clone()).await;
                Some(record)
            }
            Ok(None) => {
                debug!(request_id = %self.request_id, "no existing payment");
                None
            }
            Err(e) => {
                warn!(request_id = %self.request_id, error = %e, "payment lookup by request failed");
                None
            }
        }
    }

    async fn sync_with_backend(&self, candidate: PaymentRecord) {
        self.state.lock().await.payment_id = Some(candidate.id.clone());

        match self.ports.api.check_status(&candidate.id).await {
            Ok(check) if check.success => {
                let record = check.payment.unwrap_or_else(|| candidate.clone());
                if record.id != candidate.id {
                    self.cache_delete(&candidate.id).await;
                }
                self.cache_put(record.clone()).await;

                let mut state = self.state.lock().await;
                state.simulation = check.simulation;
                state.adopt(&record);
                state.banner = status_banner(record.status);
                info!(request_id = %self.request_id, payment_id = %record.id, step = %state.step, "reconciled with backend");
            }
            Ok(check) => {
                warn!(
                    payment_id = %candidate.id,
                    message = check.message.as_deref().unwrap_or(""),
                    "status check unsuccessful, keeping cached state"
                );
                self.state.lock().await.adopt(&candidate);
            }
            Err(e) if e.is_not_found() => {
                warn!(payment_id = %candidate.id, "payment unknown to backend, clearing stale cache entry");
                self.cache_delete(&candidate.id).await;
                self.recover_by_request(&candidate.id).await;
            }
            Err(e) => {
                warn!(payment_id = %candidate.id, error = %e, "status check failed, keeping cached state");
                self.state.lock().await.adopt(&candidate);
            }
        }
    }

    /// Looks up whatever payment the backend holds for the request once a cached id
    /// turned out to be unknown, and starts over at Pay only if there is none.
    async fn recover_by_request(&self, stale_id: &str) {
        match self.ports.api.status_by_request(&self.request_id).await {
            Ok(Some(record)) if record.id != stale_id => {
                info!(request_id = %self.request_id, payment_id = %record.id, "recovered payment by request");
                self.cache_put(record.clone()).await;
                let mut state = self.state.lock().await;
                state.adopt(&record);
                state.banner = status_banner(record.status);
            }
            Ok(_) => self.state.lock().await.clear_payment(),
            Err(e) => {
                warn!(request_id = %self.request_id, error = %e, "payment lookup by request failed");
                self.state.lock().await.clear_payment();
            }
        }
    }

    /// Consumes the redirect marker and, if the payment was not yet confirmed,
    /// verifies it once after the configured delay.
    async fn resume_after_redirect(&self) {
        let marker = match self.ports.markers.take_redirect(&self.request_id).await {
            Ok(Some(marker)) => marker,
            Ok(None) => return,
            Err(e) => {
                warn!(request_id = %self.request_id, error = %e, "failed to read redirect marker");
                return;
            }
        };

        let last_known = match self.ports.cache.get(&marker.payment_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(payment_id = %marker.payment_id, error = %e, "payment cache read failed");
                None
            }
        };
        let Some(record) = last_known else {
            debug!(payment_id = %marker.payment_id, "no cached payment for redirect marker");
            return;
        };
        if record.status >= PaymentStatus::Escrowed {
            debug!(payment_id = %record.id, status = %record.status, "payment already confirmed");
            return;
        }

        {
            let mut state = self.state.lock().await;
            state.payment_id = Some(record.id.clone());
            if marker.gateway_payment_id.is_some() {
                state.gateway_payment_id = marker.gateway_payment_id.clone();
            }
            state.set_step(WizardStep::Verify);
            state.banner = Some(Banner::info(
                "Returned from the payment gateway. Verifying payment status...",
            ));
        }

        self.ports.scheduler.sleep(self.config.auto_verify_delay).await;

        let Ok(_guard) = InFlight::begin(&self.verifying, "verify") else {
            return;
        };
        info!(request_id = %self.request_id, payment_id = %record.id, "verifying payment after redirect");

        match self.ports.api.check_status(&record.id).await {
            Ok(check) if check.success => {
                let confirmed = match confirm_escrow(
                    check.payment.unwrap_or_else(|| record.clone()),
                    marker.gateway_payment_id,
                ) {
                    Ok(confirmed) => confirmed,
                    Err(e) => {
                        self.state.lock().await.banner = Some(Banner::error(e.user_message()));
                        return;
                    }
                };
                if confirmed.id != record.id {
                    self.cache_delete(&record.id).await;
                }
                self.cache_put(confirmed.clone()).await;

                let mut state = self.state.lock().await;
                state.simulation = check.simulation;
                state.adopt(&confirmed);
                state.banner = Some(Banner::success(
                    "Payment successful and deposited to escrow!",
                ));
            }
            Ok(check) => {
                self.state.lock().await.banner = Some(Banner::error(
                    check
                        .message
                        .unwrap_or_else(|| "Payment verification failed.".to_string()),
                ));
            }
            Err(e) => {
                warn!(payment_id = %record.id, error = %e, "post-redirect verification failed");
                self.state.lock().await.banner = Some(Banner::error(
                    "Could not verify payment status. Please verify the payment again.",
                ));
            }
        }
    }

    /// Step 1: creates the gateway order and opens the hosted checkout.
    pub async fn pay(&self, order: &OrderDetails, client_id: &str) -> Result<PayOutcome> {
        let _guard = InFlight::begin(&self.paying, "pay")?;
        self.expect_step(WizardStep::Pay, "pay").await?;

        if client_id.trim().is_empty() {
            return self
                .fail(ReconcileError::Validation("Missing client ID".to_string()))
                .await;
        }
        if order.creator_id.trim().is_empty() {
            return self
                .fail(ReconcileError::Validation("Creator ID is missing".to_string()))
                .await;
        }
        if order.quote.total == 0 {
            return self
                .fail(ReconcileError::Validation("Invalid payment amount".to_string()))
                .await;
        }

        self.state.lock().await.banner = None;

        if !self.ports.gateway.load().await {
            return self
                .fail(ReconcileError::Gateway(
                    "Payment gateway failed to load".to_string(),
                ))
                .await;
        }

        let request = CreateOrderRequest {
            client_id: client_id.to_string(),
            creator_id: order.creator_id.clone(),
            request_id: self.request_id.clone(),
            amount: order.quote.total,
            description: order.description(),
        };
        let created = match self.ports.api.create_order(&request).await {
            Ok(created) => created,
            Err(e) => return self.fail(e).await,
        };
        info!(request_id = %self.request_id, payment_id = %created.payment_id, order_id = %created.order_id, "escrow order created");
        let payment_id = created.payment_id.clone();

        self.drop_abandoned_orders().await;
        let record = PaymentRecord::pending(
            payment_id.clone(),
            self.request_id.clone(),
            order.quote.total,
            created.order_id.clone(),
        );
        self.cache_put(record).await;
        {
            let mut state = self.state.lock().await;
            state.payment_id = Some(payment_id.clone());
            state.checkout = Some(CheckoutContext {
                order: order.clone(),
                client_id: client_id.to_string(),
            });
        }

        let session = CheckoutSession {
            key_id: created.key_id,
            order_id: created.order_id,
            amount_minor: created.amount_paise,
            currency: created.currency,
            merchant_name: self.config.merchant_name.clone(),
            description: format!("Booking for {}", order.project_type),
            prefill_email: client_id.to_string(),
        };

        let marker = RedirectMarker {
            request_id: self.request_id.clone(),
            payment_id: created.payment_id,
            gateway_payment_id: None,
        };
        if let Err(e) = self.ports.markers.set_redirect(marker).await {
            warn!(request_id = %self.request_id, error = %e, "failed to stash redirect marker");
        }

        let outcome = match self.ports.gateway.open_checkout(&session).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.abandon_checkout(&payment_id).await;
                return self.fail(e).await;
            }
        };

        match outcome {
            GatewayOutcome::Success(callback) => {
                let view = self.complete_gateway_payment(callback).await?;
                Ok(PayOutcome::Escrowed(view))
            }
            GatewayOutcome::Failed { reason } => {
                self.abandon_checkout(&payment_id).await;
                self.fail(ReconcileError::Gateway(reason)).await
            }
            GatewayOutcome::Redirected => {
                info!(request_id = %self.request_id, "client redirected to gateway checkout");
                Ok(PayOutcome::Redirected(session))
            }
        }
    }

    /// Delivers a gateway success callback that arrived outside [`Self::pay`].
    pub async fn gateway_callback(&self, callback: GatewayCallback) -> Result<ReconcilerView> {
        let _guard = InFlight::begin(&self.verifying, "verify")?;
        let step = self.state.lock().await.step;
        if !matches!(step, WizardStep::Pay | WizardStep::Verify) {
            return self
                .fail(ReconcileError::StepMismatch {
                    action: "verify",
                    current: step.title(),
                })
                .await;
        }
        self.complete_gateway_payment(callback).await
    }

    async fn complete_gateway_payment(&self, callback: GatewayCallback) -> Result<ReconcilerView> {
        let ack = match self.ports.api.verify_payment(&callback).await {
            Ok(ack) => ack,
            Err(e) => return self.fail(e).await,
        };
        if !ack.success {
            self.clear_redirect().await;
            return self
                .fail(ReconcileError::Api {
                    status: None,
                    message: ack.message.unwrap_or_else(|| {
                        "Payment verification failed. Please contact support.".to_string()
                    }),
                })
                .await;
        }

        let Some(record) = self.active_record().await else {
            return self.fail(ReconcileError::NoActivePayment).await;
        };
        let record = match confirm_escrow(record, Some(callback.payment_id.clone())) {
            Ok(record) => record,
            Err(e) => return self.fail(e).await,
        };
        self.cache_put(record.clone()).await;
        self.clear_redirect().await;

        let checkout = {
            let mut state = self.state.lock().await;
            state.simulation = ack.simulation;
            state.adopt(&record);
            state.banner = Some(Banner::success("Payment verified and held in escrow!"));
            state.checkout.clone()
        };
        info!(request_id = %self.request_id, payment_id = %record.id, "payment held in escrow");

        let receipt = PaymentReceipt::new(
            &record,
            checkout.as_ref().map(|c| &c.order),
            checkout.as_ref().map(|c| c.client_id.as_str()),
        );
        self.notify_best_effort(PaymentNotice::Escrowed(receipt)).await;

        Ok(self.view().await)
    }

    /// Step 2: asks the backend to check the gateway out of band.
    pub async fn verify(&self) -> Result<ReconcilerView> {
        let _guard = InFlight::begin(&self.verifying, "verify")?;
        self.expect_step(WizardStep::Verify, "verify").await?;

        let payment_id = self.state.lock().await.payment_id.clone();
        let Some(payment_id) = payment_id else {
            return self.fail(ReconcileError::NoActivePayment).await;
        };
        self.state.lock().await.banner = Some(Banner::info("Checking payment status..."));

        let check = match self.ports.api.check_status(&payment_id).await {
            Ok(check) => check,
            Err(e) => return self.fail(e).await,
        };
        if !check.success {
            return self
                .fail(ReconcileError::Api {
                    status: None,
                    message: check
                        .message
                        .unwrap_or_else(|| "Payment not completed".to_string()),
                })
                .await;
        }

        let fallback = match check.payment {
            Some(payment) => payment,
            None => self.known_record(&payment_id).await,
        };
        let gateway_payment_id = self.state.lock().await.gateway_payment_id.clone();
        let record = match confirm_escrow(fallback, gateway_payment_id) {
            Ok(record) => record,
            Err(e) => return self.fail(e).await,
        };
        self.cache_put(record.clone()).await;

        let mut state = self.state.lock().await;
        state.simulation = check.simulation;
        state.adopt(&record);
        let message = check
            .message
            .unwrap_or_else(|| "Payment verified and held in escrow".to_string());
        state.banner = Some(Banner::success(if check.simulation {
            format!("SIMULATION: {}", message)
        } else {
            message
        }));
        info!(request_id = %self.request_id, payment_id = %record.id, "payment verified");
        drop(state);

        Ok(self.view().await)
    }

    /// Step 3: releases the escrowed funds to the creator.
    pub async fn release(&self) -> Result<ReconcilerView> {
        let _guard = InFlight::begin(&self.releasing, "release")?;
        self.expect_step(WizardStep::Release, "release").await?;

        let payment_id = self.state.lock().await.payment_id.clone();
        let Some(payment_id) = payment_id else {
            return self.fail(ReconcileError::NoActivePayment).await;
        };
        self.state.lock().await.banner = None;

        let ack = match self.ports.api.confirm_release(&payment_id).await {
            Ok(ack) => ack,
            Err(e) => return self.fail(e).await,
        };
        if !ack.success {
            return self
                .fail(ReconcileError::Api {
                    status: None,
                    message: ack
                        .message
                        .unwrap_or_else(|| "Failed to release payment".to_string()),
                })
                .await;
        }

        let mut record = self.known_record(&payment_id).await;
        if record.status == PaymentStatus::Pending {
            // the cache may never have seen the escrow step
            record.status = PaymentStatus::Escrowed;
        }
        if let Err(e) = record.mark_completed(Utc::now()) {
            return self.fail(e).await;
        }
        self.cache_put(record.clone()).await;

        {
            let mut state = self.state.lock().await;
            state.simulation = ack.simulation;
            state.adopt(&record);
            let text = match (ack.simulation, ack.message) {
                (true, Some(message)) => format!("SIMULATION: {}", message),
                _ => format!(
                    "Payment of {} released to creator successfully!",
                    format_rupees(record.amount)
                ),
            };
            state.banner = Some(Banner::success(text));
        }
        info!(request_id = %self.request_id, payment_id = %record.id, "payment released to creator");

        self.notify_best_effort(PaymentNotice::Released(record)).await;

        Ok(self.view().await)
    }

    async fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<()> {
        let current = self.state.lock().await.step;
        if current == expected {
            Ok(())
        } else {
            self.fail(ReconcileError::StepMismatch {
                action,
                current: current.title(),
            })
            .await
        }
    }

    async fn active_record(&self) -> Option<PaymentRecord> {
        let payment_id = self.state.lock().await.payment_id.clone();
        match payment_id {
            Some(id) => Some(self.known_record(&id).await),
            None => match self.ports.cache.find_by_request(&self.request_id).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(request_id = %self.request_id, error = %e, "payment cache lookup failed");
                    None
                }
            },
        }
    }

    async fn cached(&self, payment_id: &str) -> Option<PaymentRecord> {
        match self.ports.cache.get(payment_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(payment_id, error = %e, "payment cache read failed");
                None
            }
        }
    }

    /// Cached record for an id, or a bare pending one carrying the checkout total.
    async fn known_record(&self, payment_id: &str) -> PaymentRecord {
        if let Some(record) = self.cached(payment_id).await {
            return record;
        }
        let amount = self
            .state
            .lock()
            .await
            .checkout
            .as_ref()
            .map(|checkout| checkout.order.quote.total)
            .unwrap_or(0);
        PaymentRecord {
            id: payment_id.to_string(),
            request_id: self.request_id.clone(),
            status: PaymentStatus::Pending,
            amount,
            gateway_order_id: None,
            gateway_payment_id: None,
            completed_at: None,
        }
    }

    /// Removes pending records an earlier checkout for this request left behind.
    async fn drop_abandoned_orders(&self) {
        let records = match self.ports.cache.all().await {
            Ok(records) => records,
            Err(e) => {
                warn!(request_id = %self.request_id, error = %e, "payment cache scan failed");
                return;
            }
        };
        for record in records {
            if record.request_id == self.request_id && record.status == PaymentStatus::Pending {
                debug!(payment_id = %record.id, "dropping abandoned order");
                self.cache_delete(&record.id).await;
            }
        }
    }

    /// Forgets an order whose checkout did not go through.
    async fn abandon_checkout(&self, payment_id: &str) {
        self.cache_delete(payment_id).await;
        self.clear_redirect().await;
        let mut state = self.state.lock().await;
        state.payment_id = None;
        state.checkout = None;
    }

    async fn cache_put(&self, record: PaymentRecord) {
        let payment_id = record.id.clone();
        if let Err(e) = self.ports.cache.put(record).await {
            warn!(payment_id = %payment_id, error = %e, "payment cache write failed");
        }
    }

    async fn cache_delete(&self, payment_id: &str) {
        if let Err(e) = self.ports.cache.delete(payment_id).await {
            warn!(payment_id, error = %e, "payment cache delete failed");
        }
    }

    async fn clear_redirect(&self) {
        if let Err(e) = self.ports.markers.take_redirect(&self.request_id).await {
            warn!(request_id = %self.request_id, error = %e, "failed to clear redirect marker");
        }
    }

    async fn notify_best_effort(&self, notice: PaymentNotice) {
        if let Err(e) = self.ports.notifier.notify(notice).await {
            warn!(request_id = %self.request_id, error = %e, "payment notification failed");
        }
    }

    async fn fail<T>(&self, error: ReconcileError) -> Result<T> {
        warn!(request_id = %self.request_id, error = %error, "payment action failed");
        self.state.lock().await.banner = Some(Banner::error(error.user_message()));
        Err(error)
    }
}

/// Moves a record the backend has confirmed into escrow; later states are kept.
fn confirm_escrow(
    mut record: PaymentRecord,
    gateway_payment_id: Option<String>,
) -> Result<PaymentRecord> {
    if record.status == PaymentStatus::Pending {
        record.mark_escrowed(gateway_payment_id)?;
    } else if record.gateway_payment_id.is_none() {
        record.gateway_payment_id = gateway_payment_id;
    }
    Ok(record)
}

fn status_banner(status: PaymentStatus) -> Option<Banner> {
    match status {
        PaymentStatus::Completed => Some(Banner::success("Payment released to creator")),
        PaymentStatus::Escrowed => Some(Banner::success("Payment held in escrow")),
        PaymentStatus::Pending => None,
    }
}
