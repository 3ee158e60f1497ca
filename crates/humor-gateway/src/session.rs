//! Session-scoped state keyed by the `humor_session` cookie.
//!
//! Each session owns its history and the credential typed into the sidebar. The per-session
//! mutex is held across a generation call, so one session's submissions run one at a time.
//! The server never sees a page close, so sessions idle longer than the configured TTL are
//! evicted instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap};
use dashmap::DashMap;
use humor_core::SessionHistory;
use tokio::sync::Mutex;

pub const SESSION_COOKIE: &str = "humor_session";

/// State owned by one interactive session. Created empty, dropped on reset or eviction.
#[derive(Debug, Default)]
pub struct Session {
    pub history: SessionHistory,
    pub credential: Option<String>,
}

pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionSlot {
    handle: SessionHandle,
    last_seen: Instant,
}

pub struct SessionRegistry {
    sessions: DashMap<String, SessionSlot>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    /// Existing session for `id`, refreshing its idle timer. Never creates one.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut slot = self.sessions.get_mut(id)?;
        slot.last_seen = Instant::now();
        Some(Arc::clone(&slot.handle))
    }

    /// Look up the session for `id`, or start a fresh one. Unknown ids are never adopted;
    /// a new id is issued instead. Idle sessions are pruned before a new one is registered.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        if let Some(handle) = id.and_then(|id| self.get(id)) {
            return (id.unwrap_or_default().to_string(), handle);
        }
        self.prune_idle();
        let id = uuid::Uuid::new_v4().to_string();
        let handle: SessionHandle = Arc::new(Mutex::new(Session::default()));
        self.sessions.insert(
            id.clone(),
            SessionSlot {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        tracing::info!(session = %id, "session started");
        (id, handle)
    }

    /// End a session explicitly. Returns false if it did not exist.
    pub fn end(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "session ended");
        }
        removed
    }

    /// Drop sessions not seen within the idle TTL. Returns how many were evicted.
    pub fn prune_idle(&self) -> usize {
        self.prune_idle_at(Instant::now())
    }

    pub fn prune_idle_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| now.saturating_duration_since(slot.last_seen) <= self.idle_ttl);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "idle sessions evicted");
        }
        evicted
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Session id from the request's `Cookie` headers, if present.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value binding the browser to session `id`.
pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn parses_session_from_cookie_list() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; humor_session=abc-123; other=1"),
        );
        assert_eq!(session_id(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_id(&HeaderMap::new()), None);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("humor_session="));
        assert_eq!(session_id(&headers), None);
    }

    #[test]
    fn known_id_is_reused_unknown_is_replaced() {
        let registry = SessionRegistry::new(TTL);
        let (id, first) = registry.get_or_create(None);
        let (same, second) = registry.get_or_create(Some(&id));
        assert_eq!(id, same);
        assert!(Arc::ptr_eq(&first, &second));

        let (fresh, _) = registry.get_or_create(Some("forged"));
        assert_ne!(fresh, "forged");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_never_creates() {
        let registry = SessionRegistry::new(TTL);
        assert!(registry.get("nobody").is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn end_drops_session() {
        let registry = SessionRegistry::new(TTL);
        let (id, _) = registry.get_or_create(None);
        assert!(registry.end(&id));
        assert!(!registry.end(&id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn idle_sessions_are_evicted_after_ttl() {
        let registry = SessionRegistry::new(TTL);
        for _ in 0..10 {
            registry.get_or_create(None);
        }
        assert_eq!(registry.prune_idle_at(Instant::now()), 0);
        assert_eq!(registry.len(), 10);

        let later = Instant::now() + TTL + Duration::from_secs(1);
        assert_eq!(registry.prune_idle_at(later), 10);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn touched_session_survives_pruning() {
        let registry = SessionRegistry::new(Duration::from_millis(50));
        let (kept, _) = registry.get_or_create(None);
        let (dropped, _) = registry.get_or_create(None);
        std::thread::sleep(Duration::from_millis(80));
        assert!(registry.get(&kept).is_some());

        registry.prune_idle();
        assert!(registry.get(&kept).is_some());
        assert!(registry.get(&dropped).is_none());
    }

    #[test]
    fn evicted_session_cookie_gets_a_new_session() {
        let registry = SessionRegistry::new(TTL);
        let (old, _) = registry.get_or_create(None);
        registry.prune_idle_at(Instant::now() + TTL * 2);
        let (fresh, _) = registry.get_or_create(Some(&old));
        assert_ne!(old, fresh);
    }
}
