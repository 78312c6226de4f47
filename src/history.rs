//! Client-side mirror of the service's recent-uploads list.
//!
//! The cache never merges, sorts or evicts: every refresh replaces the whole
//! list with whatever the service returned. Bounding the list is the
//! service's job; zero, five or fifty entries are all shown as received.
//!
//! A failed fetch leaves a notice next to the (emptied) entries. Both are
//! written under the same lock, so readers never pair one fetch's entries
//! with another fetch's notice.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::{
    api::{normalize_error, AnalysisApi, ApiError},
    models::SummaryPayload,
};

pub const HISTORY_NOTICE_PREFIX: &str = "Could not load upload history";

#[derive(Debug, Default)]
struct HistoryInner {
    entries: Vec<SummaryPayload>,
    notice: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Entries, notice and refresh time as written by one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    pub entries: Vec<SummaryPayload>,
    pub notice: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    inner: Arc<RwLock<HistoryInner>>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches and applies the latest history.
    pub async fn refresh(&self, api: &dyn AnalysisApi) -> Result<usize, ApiError> {
        let result = api.fetch_history().await;
        self.apply(result)
    }

    /// Replaces the entries with a fetch result. A failed fetch empties the
    /// cache, records a notice for the view, and hands the error back.
    pub fn apply(&self, result: Result<Vec<SummaryPayload>, ApiError>) -> Result<usize, ApiError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.refreshed_at = Some(Utc::now());
        match result {
            Ok(entries) => {
                let count = entries.len();
                guard.entries = entries;
                guard.notice = None;
                Ok(count)
            }
            Err(err) => {
                guard.entries.clear();
                guard.notice = Some(format!(
                    "{HISTORY_NOTICE_PREFIX}: {}",
                    normalize_error(&err)
                ));
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        HistorySnapshot {
            entries: guard.entries.clone(),
            notice: guard.notice.clone(),
            refreshed_at: guard.refreshed_at,
        }
    }

    /// Set after a failed fetch, cleared by the next successful one.
    pub fn notice(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .notice
            .clone()
    }

    pub fn entries(&self) -> Vec<SummaryPayload> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the last fetch (successful or not) was applied.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .refreshed_at
    }
}
