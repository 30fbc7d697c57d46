use crate::domain::gateway::{CheckoutSession, GatewayOutcome};
use crate::domain::ports::PaymentGateway;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Hosted checkout reached by sending the client to the gateway's own pages.
///
/// The callback never fires in-process; the payment is picked up again by the
/// redirect-return verification on the next load.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectGateway;

#[async_trait]
impl PaymentGateway for RedirectGateway {
    async fn load(&self) -> bool {
        true
    }

    async fn open_checkout(&self, session: &CheckoutSession) -> Result<GatewayOutcome> {
        info!(
            order_id = %session.order_id,
            amount_minor = session.amount_minor,
            currency = %session.currency,
            "handing checkout to the payment gateway"
        );
        Ok(GatewayOutcome::Redirected)
    }
}
