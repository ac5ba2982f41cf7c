//! Periodic subscription sweep

use crate::case_id::CaseId;
use crate::fetcher::DocumentSource;
use crate::processor::DecreeProcessor;
use crate::scanner::ScanOutcome;
use crate::subscription::{Subscription, SubscriptionStore};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Time allowed for one subscription's lookup
pub const DEFAULT_ITEM_DEADLINE: Duration = Duration::from_secs(30);

/// Something worth telling a subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The case is not listed in its bulletin
    NotFound { case_id: CaseId },

    /// The case is listed as resolved; the subscription has been dropped
    Resolved { case_id: CaseId },
}

impl Notice {
    pub fn case_id(&self) -> &CaseId {
        match self {
            Self::NotFound { case_id } | Self::Resolved { case_id } => case_id,
        }
    }
}

/// A notice could not be delivered
#[derive(Debug, Clone, Error)]
#[error("failed to deliver notice: {0}")]
pub struct NotifyError(pub String);

/// Delivers notices to subscribers
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: i64, notice: &Notice) -> Result<(), NotifyError>;
}

/// Counters for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub not_found: usize,
    pub pending: usize,
    pub resolved: usize,
    pub failed: usize,
}

impl CheckSummary {
    fn record(&mut self, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::NotFound => self.not_found += 1,
            ScanOutcome::FoundUnresolved => self.pending += 1,
            ScanOutcome::FoundResolved => self.resolved += 1,
        }
    }
}

/// Runs every stored subscription through the processor
pub struct SubscriptionChecker<S> {
    processor: Arc<DecreeProcessor<S>>,
    store: Arc<dyn SubscriptionStore>,
    notifier: Arc<dyn Notifier>,
    item_deadline: Duration,
}

impl<S: DocumentSource> SubscriptionChecker<S> {
    pub fn new(
        processor: Arc<DecreeProcessor<S>>,
        store: Arc<dyn SubscriptionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            processor,
            store,
            notifier,
            item_deadline: DEFAULT_ITEM_DEADLINE,
        }
    }

    /// Overrides the per-subscription deadline
    pub fn with_item_deadline(mut self, deadline: Duration) -> Self {
        self.item_deadline = deadline;
        self
    }

    /// Checks all subscriptions once
    ///
    /// Subscriptions are processed one after another so repeated years are
    /// served from the fetcher's cache. A failing subscription is logged and
    /// counted; it never stops the sweep.
    ///
    /// # Returns
    ///
    /// * `Ok(CheckSummary)` - The sweep ran to completion
    /// * `Err(DecreeError::Store)` - Subscriptions could not be listed
    pub async fn check_all(&self) -> crate::Result<CheckSummary> {
        let subscriptions = self.store.list_all().await?;
        let mut summary = CheckSummary::default();

        if subscriptions.is_empty() {
            return Ok(summary);
        }

        tracing::info!("Checking {} subscriptions", subscriptions.len());

        for subscription in &subscriptions {
            summary.checked += 1;
            match self.check_one(subscription).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        "Error processing subscription {} for chat {}: {}",
                        subscription.case_id,
                        subscription.chat_id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Sweep finished: {} checked, {} resolved, {} pending, {} not found, {} failed",
            summary.checked,
            summary.resolved,
            summary.pending,
            summary.not_found,
            summary.failed
        );

        Ok(summary)
    }

    async fn check_one(&self, subscription: &Subscription) -> crate::Result<ScanOutcome> {
        let Subscription { chat_id, case_id } = subscription;
        let verdict = self
            .processor
            .handle_with_deadline(case_id.as_str(), self.item_deadline)
            .await?;

        match verdict.outcome {
            ScanOutcome::NotFound => {
                let notice = Notice::NotFound {
                    case_id: case_id.clone(),
                };
                self.notifier.notify(*chat_id, &notice).await?;
                tracing::debug!("Notified chat {} that {} was not found", chat_id, case_id);
            }
            ScanOutcome::FoundResolved => {
                let notice = Notice::Resolved {
                    case_id: case_id.clone(),
                };
                self.notifier.notify(*chat_id, &notice).await?;
                self.store.delete(*chat_id, case_id).await?;
                tracing::info!("{} resolved, subscription for chat {} removed", case_id, chat_id);
            }
            ScanOutcome::FoundUnresolved => {}
        }

        Ok(verdict.outcome)
    }
}
