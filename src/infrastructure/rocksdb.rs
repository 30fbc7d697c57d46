use crate::domain::gateway::RedirectMarker;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentCache, SessionMarkers};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for cached payment records, keyed by payment id.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for redirect markers, keyed by request id.
pub const CF_SESSION: &str = "session";

/// A persistent payment cache backed by RocksDB.
///
/// Records and redirect markers live in separate Column Families. Values are JSON.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_session = ColumnFamilyDescriptor::new(CF_SESSION, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_session])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| ReconcileError::Storage(format!("{} column family not found", name)))
    }
}

#[async_trait]
impl PaymentCache for RocksDbStore {
    async fn get(&self, payment_id: &str) -> Result<Option<PaymentRecord>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(cf, payment_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: PaymentRecord) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(cf, record.id.as_bytes(), value)?;
        Ok(())
    }

    async fn delete(&self, payment_id: &str) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        self.db.delete_cf(cf, payment_id.as_bytes())?;
        Ok(())
    }

    async fn find_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|record| record.request_id == request_id))
    }

    async fn all(&self) -> Result<Vec<PaymentRecord>> {
        let cf = self.cf(CF_PAYMENTS)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl SessionMarkers for RocksDbStore {
    async fn set_redirect(&self, marker: RedirectMarker) -> Result<()> {
        let cf = self.cf(CF_SESSION)?;
        let value = serde_json::to_vec(&marker)?;
        self.db.put_cf(cf, marker.request_id.as_bytes(), value)?;
        Ok(())
    }

    async fn take_redirect(&self, request_id: &str) -> Result<Option<RedirectMarker>> {
        let cf = self.cf(CF_SESSION)?;
        let Some(bytes) = self.db.get_cf(cf, request_id.as_bytes())? else {
            return Ok(None);
        };
        self.db.delete_cf(cf, request_id.as_bytes())?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
