use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Another {0} request is already in flight")]
    ActionInFlight(&'static str),
    #[error("Cannot {action} while at the {current} step")]
    StepMismatch {
        action: &'static str,
        current: &'static str,
    },
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("No active payment for this request")]
    NoActivePayment,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

impl ReconcileError {
    /// Text suitable for the inline banner.
    pub fn user_message(&self) -> String {
        match self {
            ReconcileError::Api { message, .. } => message.clone(),
            ReconcileError::Validation(message) | ReconcileError::Gateway(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
