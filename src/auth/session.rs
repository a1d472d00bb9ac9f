//! Bearer session registry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::Principal;

#[derive(Debug, Clone)]
struct Session {
    principal: Principal,
    // None when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl Session {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Thread-safe map of issued tokens to the principal they authenticate.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh opaque token for `principal`.
    ///
    /// Expired sessions are swept first, so tokens that are never presented
    /// again do not accumulate.
    pub fn issue(&self, principal: Principal) -> String {
        let now = Instant::now();
        self.sweep(now);

        let token = Uuid::new_v4().to_string();
        tracing::debug!(user_id = principal.id, "Session issued");
        self.sessions.insert(
            token.clone(),
            Session {
                principal,
                expires_at: now.checked_add(self.ttl),
            },
        );
        token
    }

    /// Look up a token. Expired sessions are dropped on access.
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        let principal = {
            let session = self.sessions.get(token)?;
            if session.is_live(Instant::now()) {
                Some(session.principal.clone())
            } else {
                None
            }
        };

        if principal.is_none() {
            self.sessions.remove(token);
            tracing::debug!("Expired session removed");
        }
        principal
    }

    fn sweep(&self, now: Instant) {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.is_live(now));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, "Expired sessions swept");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 1,
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn test_issue_and_resolve() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let token = registry.issue(principal());
        assert_eq!(registry.resolve(&token), Some(principal()));
        assert_eq!(registry.resolve("unknown"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_expired_session_is_removed() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let token = registry.issue(principal());
        assert_eq!(registry.resolve(&token), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let registry = SessionRegistry::new(Duration::from_secs(u64::MAX));
        let token = registry.issue(principal());
        assert_eq!(registry.resolve(&token), Some(principal()));
    }

    #[test]
    fn test_issue_sweeps_unused_expired_tokens() {
        let registry = SessionRegistry::new(Duration::from_millis(1));
        for _ in 0..1000 {
            registry.issue(principal());
        }
        std::thread::sleep(Duration::from_millis(20));

        let token = registry.issue(principal());
        assert_eq!(registry.len(), 1);
        assert!(registry.sessions.contains_key(&token));
    }
}
