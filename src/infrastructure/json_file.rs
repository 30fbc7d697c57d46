use crate::domain::gateway::RedirectMarker;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentCache, SessionMarkers};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// File holding cached payment records, keyed by payment id.
pub const PAYMENTS_FILE: &str = "payments.json";
/// File holding redirect markers, keyed by request id.
pub const SESSION_FILE: &str = "session.json";

/// Payment cache persisted as JSON documents in a directory.
///
/// Every write replaces the whole document through a temporary file in the same
/// directory, so readers never observe a half-written file. Clones share one lock.
#[derive(Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Opens (and creates, if missing) the store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Arc::new(Mutex::new(())),
        })
    }

    fn read_map<T: DeserializeOwned>(&self, file: &str) -> Result<BTreeMap<String, T>> {
        let path = self.dir.join(file);
        match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ReconcileError::Storage(format!("corrupt {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map<T: Serialize>(&self, file: &str, map: &BTreeMap<String, T>) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, map)?;
        tmp.flush()?;
        tmp.persist(self.dir.join(file))
            .map_err(|e| ReconcileError::Io(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl PaymentCache for JsonFileStore {
    async fn get(&self, payment_id: &str) -> Result<Option<PaymentRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_map::<PaymentRecord>(PAYMENTS_FILE)?;
        Ok(records.remove(payment_id))
    }

    async fn put(&self, record: PaymentRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_map::<PaymentRecord>(PAYMENTS_FILE)?;
        records.insert(record.id.clone(), record);
        self.write_map(PAYMENTS_FILE, &records)
    }

    async fn delete(&self, payment_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_map::<PaymentRecord>(PAYMENTS_FILE)?;
        if records.remove(payment_id).is_some() {
            self.write_map(PAYMENTS_FILE, &records)?;
        }
        Ok(())
    }

    async fn find_by_request(&self, request_id: &str) -> Result<Option<PaymentRecord>> {
        let _guard = self.lock.lock().await;
        let records = self.read_map::<PaymentRecord>(PAYMENTS_FILE)?;
        Ok(records
            .into_values()
            .find(|record| record.request_id == request_id))
    }

    async fn all(&self) -> Result<Vec<PaymentRecord>> {
        let _guard = self.lock.lock().await;
        let records = self.read_map::<PaymentRecord>(PAYMENTS_FILE)?;
        Ok(records.into_values().collect())
    }
}

#[async_trait]
impl SessionMarkers for JsonFileStore {
    async fn set_redirect(&self, marker: RedirectMarker) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut markers = self.read_map::<RedirectMarker>(SESSION_FILE)?;
        markers.insert(marker.request_id.clone(), marker);
        self.write_map(SESSION_FILE, &markers)
    }

    async fn take_redirect(&self, request_id: &str) -> Result<Option<RedirectMarker>> {
        let _guard = self.lock.lock().await;
        let mut markers = self.read_map::<RedirectMarker>(SESSION_FILE)?;
        let taken = markers.remove(request_id);
        if taken.is_some() {
            self.write_map(SESSION_FILE, &markers)?;
        }
        Ok(taken)
    }
}
