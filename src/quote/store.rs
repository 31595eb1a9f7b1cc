//! In-memory draft sessions using moka
//!
//! Holds the quote drafts of active wizard sessions. Drafts that sit idle
//! past the configured window are evicted; nothing here is durable.

use chrono::{DateTime, Datelike, Utc};
use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::QuoteConfig;
use crate::error::{AppError, Result};

use super::draft::{apply, DraftAction, DraftContext, QuoteDraft};

/// Draft session cache
#[derive(Clone)]
pub struct QuoteStore {
    drafts: Cache<Uuid, Arc<QuoteDraft>>,
    sequence: Arc<AtomicU32>,
    /// Serializes read-apply-write so concurrent actions cannot drop updates
    write_lock: Arc<Mutex<()>>,
}

impl QuoteStore {
    pub fn new(config: &QuoteConfig) -> Self {
        Self {
            drafts: Cache::builder()
                .max_capacity(config.max_sessions)
                .time_to_idle(Duration::from_secs(config.idle_minutes * 60))
                .build(),
            sequence: Arc::new(AtomicU32::new(0)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Quote numbers look like `QT-2026-0042`
    pub fn next_quote_number(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("QT-{}-{:04}", now.year(), seq)
    }

    /// Fresh draft with an id and quote number, not yet stored
    pub fn open(&self, now: DateTime<Utc>) -> QuoteDraft {
        QuoteDraft::new(Uuid::new_v4(), self.next_quote_number(now), now)
    }

    /// Store a draft built with [`QuoteStore::open`]
    pub async fn insert(&self, draft: QuoteDraft) -> Arc<QuoteDraft> {
        let draft = Arc::new(draft);
        self.drafts.insert(draft.id, draft.clone()).await;
        info!(quote_id = %draft.id, quote_number = %draft.quote_number, "Draft created");
        draft
    }

    /// Start a new, empty draft session
    pub async fn create(&self, now: DateTime<Utc>) -> Arc<QuoteDraft> {
        self.insert(self.open(now)).await
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<QuoteDraft>> {
        let draft = self.drafts.get(&id).await;
        if draft.is_none() {
            debug!(quote_id = %id, "Draft cache MISS");
        }
        draft
    }

    /// Run one action against a stored draft and keep the result.
    pub async fn apply(
        &self,
        id: Uuid,
        action: DraftAction,
        ctx: &DraftContext<'_>,
    ) -> Result<Arc<QuoteDraft>> {
        let _guard = self.write_lock.lock().await;

        let current = self.get(id).await.ok_or(AppError::NotFound)?;
        let kind = action.kind();

        let next = match apply(&current, action, ctx) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                warn!(quote_id = %id, action = kind, error = %e, "Draft action rejected");
                return Err(e.into());
            }
        };

        if next.status != current.status {
            info!(
                quote_id = %id,
                quote_number = %next.quote_number,
                revision = next.revision,
                status = ?next.status,
                "Quote status changed"
            );
        } else {
            debug!(quote_id = %id, action = kind, "Draft updated");
        }

        self.drafts.insert(id, next.clone()).await;
        Ok(next)
    }

    /// Cache statistics for monitoring
    pub async fn stats(&self) -> StoreStats {
        self.drafts.run_pending_tasks().await;
        StoreStats {
            drafts: self.drafts.entry_count(),
            issued_quote_numbers: self.sequence.load(Ordering::Relaxed),
        }
    }
}

/// Draft cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub drafts: u64,
    pub issued_quote_numbers: u32,
}
