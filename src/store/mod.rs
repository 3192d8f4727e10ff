pub mod disk;
pub mod memory;

use crate::core::config::{AppConfig, StorageKind};
use crate::core::model::{CreditCard, Loan, Transaction};
use crate::core::store::Store;
use anyhow::Result;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Records addressed by their id.
pub(crate) trait Keyed {
    fn id(&self) -> Uuid;
}

impl Keyed for CreditCard {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Loan {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Opens the store selected by the configuration.
pub fn open(config: &AppConfig) -> Result<Arc<dyn Store>> {
    match config.storage {
        StorageKind::Memory => {
            debug!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageKind::Disk => {
            let path = config.default_data_path()?;
            Ok(Arc::new(DiskStore::open(&path)?))
        }
    }
}
