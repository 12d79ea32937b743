use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use clearpath_core::{DetailKey, EntityDetail};
use clearpath_logging::{cp_debug, cp_warn};
use tokio::sync::OnceCell;

use crate::{FailurePolicy, SearchApi};

#[derive(Debug, Clone)]
struct Entry {
    detail: EntityDetail,
    failed: bool,
}

impl Entry {
    /// A 200 response may still report a failed lookup in its `error` field;
    /// that counts as a failure just like a transport or status error.
    fn fetched(key: &DetailKey, mut detail: EntityDetail) -> Self {
        let failed = detail.is_error();
        if failed && detail.reference_url.is_none() {
            detail.reference_url = Some(key.fallback_url());
        }
        Self { detail, failed }
    }
}

type Slot = Arc<OnceCell<Entry>>;

/// Session-wide memo of entity details keyed by (jurisdiction, identifier).
///
/// Each key owns a single slot; the first caller runs the fetch and every
/// concurrent caller for the same key awaits that one fetch. Distinct keys
/// share nothing but the short map lookup.
pub struct DetailCache {
    api: Arc<dyn SearchApi>,
    policy: FailurePolicy,
    slots: Mutex<HashMap<DetailKey, Slot>>,
}

impl DetailCache {
    pub fn new(api: Arc<dyn SearchApi>, policy: FailurePolicy) -> Self {
        Self {
            api,
            policy,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Returns the stored detail for `key`, fetching it at most once at a
    /// time. A failed fetch yields a synthesized record carrying the error
    /// and a fallback reference url. Under [`FailurePolicy::RetryFailures`]
    /// failed lookups, including ones the backend reports in the record's
    /// `error` field, are evicted so the next request fetches again.
    pub async fn get_or_fetch(&self, key: &DetailKey) -> EntityDetail {
        let slot = self.slot(key);
        if let Some(entry) = slot.get() {
            cp_debug!("Detail cache hit for {}", key);
            return entry.detail.clone();
        }

        let entry = slot
            .get_or_init(|| async {
                cp_debug!("Detail cache miss for {}, fetching", key);
                match self.api.entity_detail(key).await {
                    Ok(detail) => {
                        let entry = Entry::fetched(key, detail);
                        if entry.failed {
                            cp_warn!(
                                "Detail lookup for {} reported: {}",
                                key,
                                entry.detail.error.as_deref().unwrap_or_default()
                            );
                        }
                        entry
                    }
                    Err(err) => {
                        cp_warn!("Detail lookup for {} failed: {}", key, err);
                        Entry {
                            detail: EntityDetail::unavailable(key, err.user_message()),
                            failed: true,
                        }
                    }
                }
            })
            .await;

        if entry.failed && self.policy == FailurePolicy::RetryFailures {
            let mut slots = self.lock();
            if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                slots.remove(key);
            }
        }
        entry.detail.clone()
    }

    /// Number of keys with a stored or in-flight lookup.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &DetailKey) -> Slot {
        self.lock().entry(key.clone()).or_default().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DetailKey, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
