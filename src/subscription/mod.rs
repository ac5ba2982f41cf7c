//! Subscriptions and periodic re-checking
//!
//! This module handles:
//! - The [`SubscriptionStore`] contract for persisting (chat, case) pairs
//! - An in-memory store ([`MemoryStore`])
//! - Sweeping every subscription through the processor and notifying owners
//!   when a case turns up resolved or cannot be found

mod checker;
mod memory;

pub use checker::{
    CheckSummary, Notice, Notifier, NotifyError, SubscriptionChecker, DEFAULT_ITEM_DEADLINE,
};
pub use memory::MemoryStore;

use crate::case_id::CaseId;
use async_trait::async_trait;
use thiserror::Error;

/// A chat's interest in one case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub chat_id: i64,
    pub case_id: CaseId,
}

impl Subscription {
    pub fn new(chat_id: i64, case_id: CaseId) -> Self {
        Self { chat_id, case_id }
    }
}

/// Errors returned by subscription stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chat {chat_id} is already subscribed to {case_id}")]
    Duplicate { chat_id: i64, case_id: String },

    #[error("chat {chat_id} has no subscription for {case_id}")]
    NotFound { chat_id: i64, case_id: String },

    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence contract for subscriptions
///
/// A chat may subscribe to many cases and a case may be watched by many
/// chats, but each (chat, case) pair exists at most once.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Adds a subscription, failing with `Duplicate` if it already exists
    async fn create(&self, chat_id: i64, case_id: &CaseId) -> StoreResult<()>;

    /// Removes one subscription, failing with `NotFound` if it does not exist
    async fn delete(&self, chat_id: i64, case_id: &CaseId) -> StoreResult<()>;

    /// Removes every subscription of a chat, returning how many were removed
    async fn delete_all(&self, chat_id: i64) -> StoreResult<usize>;

    /// Case identifiers a chat is subscribed to, in subscription order
    async fn list_by_chat(&self, chat_id: i64) -> StoreResult<Vec<CaseId>>;

    /// Every subscription, in subscription order
    async fn list_all(&self) -> StoreResult<Vec<Subscription>>;
}
