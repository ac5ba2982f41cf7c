//! In-memory subscription store

use crate::case_id::CaseId;
use crate::subscription::{StoreError, StoreResult, Subscription, SubscriptionStore};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Keeps subscriptions in a vector guarded by a mutex
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn create(&self, chat_id: i64, case_id: &CaseId) -> StoreResult<()> {
        let mut subscriptions = self.subscriptions.lock();
        if subscriptions
            .iter()
            .any(|s| s.chat_id == chat_id && s.case_id == *case_id)
        {
            return Err(StoreError::Duplicate {
                chat_id,
                case_id: case_id.to_string(),
            });
        }

        subscriptions.push(Subscription::new(chat_id, case_id.clone()));
        Ok(())
    }

    async fn delete(&self, chat_id: i64, case_id: &CaseId) -> StoreResult<()> {
        let mut subscriptions = self.subscriptions.lock();
        let position = subscriptions
            .iter()
            .position(|s| s.chat_id == chat_id && s.case_id == *case_id)
            .ok_or_else(|| StoreError::NotFound {
                chat_id,
                case_id: case_id.to_string(),
            })?;

        subscriptions.remove(position);
        Ok(())
    }

    async fn delete_all(&self, chat_id: i64) -> StoreResult<usize> {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.chat_id != chat_id);
        Ok(before - subscriptions.len())
    }

    async fn list_by_chat(&self, chat_id: i64) -> StoreResult<Vec<CaseId>> {
        Ok(self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.chat_id == chat_id)
            .map(|s| s.case_id.clone())
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<Subscription>> {
        Ok(self.subscriptions.lock().clone())
    }
}
