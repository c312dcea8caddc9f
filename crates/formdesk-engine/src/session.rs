use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use formdesk_core::types::{now_unix, Card};
use lru::LruCache;

/// Pagination state for one requester.
#[derive(Debug, Clone)]
pub struct Session {
    pub pages: Vec<Vec<Card>>,
    pub current: usize,
    created_at: i64,
}

impl Session {
    pub fn total(&self) -> usize {
        self.pages.len()
    }
}

/// Process-wide pagination sessions, keyed by requester id.
///
/// Bounded: least-recently-used requesters are evicted at capacity, and
/// entries older than the TTL read as absent. `put` always overwrites.
/// Racing put/advance for the same requester is last-write-wins.
pub struct SessionStore {
    inner: Mutex<LruCache<String, Session>>,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    /// Store the page set for a requester, replacing any prior session.
    pub fn put(&self, requester: &str, pages: Vec<Vec<Card>>) {
        let session = Session {
            pages,
            current: 0,
            created_at: now_unix(),
        };
        self.inner
            .lock()
            .unwrap()
            .put(requester.to_string(), session);
    }

    /// Current session for a requester, if present and not expired.
    pub fn get(&self, requester: &str) -> Option<Session> {
        let mut inner = self.inner.lock().unwrap();
        let expired = match inner.get(requester) {
            Some(s) => self.expired(s),
            None => return None,
        };
        if expired {
            inner.pop(requester);
            return None;
        }
        inner.get(requester).cloned()
    }

    /// Move a requester's session to `page_index` and return that page with
    /// the total page count. Absent for unknown requesters, out-of-range
    /// indices, or expired sessions; callers fall through to normal
    /// resolution.
    pub fn advance(&self, requester: &str, page_index: usize) -> Option<(Vec<Card>, usize)> {
        let mut inner = self.inner.lock().unwrap();
        let expired = match inner.get(requester) {
            Some(s) => self.expired(s),
            None => return None,
        };
        if expired {
            inner.pop(requester);
            return None;
        }
        let session = inner.get_mut(requester)?;
        if page_index >= session.pages.len() {
            return None;
        }
        session.current = page_index;
        Some((session.pages[page_index].clone(), session.pages.len()))
    }

    fn expired(&self, session: &Session) -> bool {
        self.ttl_secs > 0 && now_unix() - session.created_at > self.ttl_secs
    }

    #[cfg(test)]
    fn backdate(&self, requester: &str, secs: i64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(s) = inner.get_mut(requester) {
            s.created_at -= secs;
        }
    }
}
