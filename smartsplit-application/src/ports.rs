use std::sync::Mutex;

use serde_json::Value;
use smartsplit_domain::Group;

use crate::error::StoreError;
use crate::records::RawGroup;

/// Durable storage for group documents, decoupled from any concrete backend.
/// Loading hands back raw records so callers decide how strictly to
/// normalize them.
pub trait GroupStore: Send + Sync {
    fn load(&self) -> Result<Vec<RawGroup>, StoreError>;
    fn save(&self, groups: &[Group]) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Store keeping serialized documents in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: Mutex<Vec<Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: Mutex::new(documents),
        }
    }
}

impl GroupStore for InMemoryStore {
    fn load(&self) -> Result<Vec<RawGroup>, StoreError> {
        let documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        documents
            .iter()
            .map(|document| Ok(serde_json::from_value(document.clone())?))
            .collect()
    }

    fn save(&self, groups: &[Group]) -> Result<(), StoreError> {
        let serialized = groups
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let mut documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        *documents = serialized;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        documents.clear();
        Ok(())
    }
}
