use crate::domain::gateway::RedirectMarker;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentCache, SessionMarkers};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory payment cache.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentRecord>>>`; clones share the same map, so a
/// test can hand one clone to a reconciler and inspect another.
#[derive(Default, Clone)]
pub struct InMemoryPaymentCache {
    records: Arc<RwLock<HashMap<String, PaymentRecord>>>,
}

impl InMemoryPaymentCache {
    /// Creates a new, empty in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentCache for InMemoryPaymentCache {
    async fn get(&self, payment_id: &str) -> Result<Option<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.get(payment_id).cloned())
    }

    async fn put(&self, record: PaymentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, payment_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records.remove(payment_id);
        Ok(())
    }

    async fn find_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.request_id == request_id)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<PaymentRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

/// Redirect markers kept for the lifetime of the process, one per request.
#[derive(Default, Clone)]
pub struct InMemorySessionMarkers {
    markers: Arc<RwLock<HashMap<String, RedirectMarker>>>,
}

impl InMemorySessionMarkers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionMarkers for InMemorySessionMarkers {
    async fn set_redirect(&self, marker: RedirectMarker) -> Result<()> {
        let mut markers = self.markers.write().await;
        markers.insert(marker.request_id.clone(), marker);
        Ok(())
    }

    async fn take_redirect(&self, request_id: &str) -> Result<Option<RedirectMarker>> {
        let mut markers = self.markers.write().await;
        Ok(markers.remove(request_id))
    }
}
