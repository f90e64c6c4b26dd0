use std::{collections::HashMap, sync::Arc, time::Duration};

use suggestbox_api::{SessionToken, Uuid};
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};

use crate::{db::Store, Error};

#[derive(Clone, Debug)]
pub struct Session {
    pub token: SessionToken,
    pub store: Arc<Mutex<Store>>,
}

#[derive(Debug)]
struct LiveSession {
    store: Arc<Mutex<Store>>,
    last_seen: Instant,
}

/// Registry of the live sessions, each with its own store
///
/// A session that has not been used for `idle_ttl` is dropped along with its store.
#[derive(Clone, Debug)]
pub struct Sessions {
    live: Arc<RwLock<HashMap<SessionToken, LiveSession>>>,
    idle_ttl: Duration,
}

impl Sessions {
    pub fn new(idle_ttl: Duration) -> Sessions {
        Sessions {
            live: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Session {
        let token = SessionToken(Uuid::new_v4());
        let store = Arc::new(Mutex::new(Store::new()));
        let now = Instant::now();
        let mut live = self.live.write().await;
        let before = live.len();
        live.retain(|_, s| now.duration_since(s.last_seen) < self.idle_ttl);
        if live.len() != before {
            tracing::debug!(num_evicted = before - live.len(), "evicted idle sessions");
        }
        live.insert(
            token,
            LiveSession {
                store: store.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(?token, num_live = live.len(), "session created");
        Session { token, store }
    }

    /// Returns the session named by `token` and marks it as just used
    pub async fn get(&self, token: SessionToken) -> Option<Session> {
        let now = Instant::now();
        let mut live = self.live.write().await;
        let s = live.get_mut(&token)?;
        if now.duration_since(s.last_seen) >= self.idle_ttl {
            live.remove(&token);
            tracing::debug!(?token, "session expired");
            return None;
        }
        s.last_seen = now;
        Some(Session {
            token,
            store: s.store.clone(),
        })
    }

    /// Resumes the session named by `token`, or starts a new one if there is none
    pub async fn resume_or_create(&self, token: Option<SessionToken>) -> Session {
        if let Some(token) = token {
            if let Some(session) = self.get(token).await {
                return session;
            }
        }
        self.create().await
    }

    pub async fn end(&self, token: SessionToken) -> Result<(), Error> {
        match self.live.write().await.remove(&token) {
            Some(_) => {
                tracing::debug!(?token, "session ended");
                Ok(())
            }
            None => Err(Error::permission_denied()),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.live.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn resume_known_session() {
        let sessions = Sessions::new(TTL);
        let s = sessions.create().await;
        let resumed = sessions.resume_or_create(Some(s.token)).await;
        assert_eq!(resumed.token, s.token);
        assert!(Arc::ptr_eq(&resumed.store, &s.store));
    }

    #[tokio::test]
    async fn unknown_token_starts_fresh_session() {
        let sessions = Sessions::new(TTL);
        let s = sessions.resume_or_create(Some(SessionToken::stub())).await;
        assert_ne!(s.token, SessionToken::stub());
        assert!(sessions.get(s.token).await.is_some());
    }

    #[tokio::test]
    async fn ended_session_is_gone() {
        let sessions = Sessions::new(TTL);
        let s = sessions.create().await;
        sessions.end(s.token).await.unwrap();
        assert!(sessions.get(s.token).await.is_none());
        assert!(sessions.end(s.token).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted() {
        let sessions = Sessions::new(TTL);
        let idle = sessions.create().await;
        let active = sessions.create().await;

        tokio::time::advance(TTL / 2).await;
        assert!(sessions.get(active.token).await.is_some());
        tokio::time::advance(TTL / 2).await;

        let fresh = sessions.create().await;
        assert_eq!(sessions.len().await, 2);
        assert!(sessions.get(idle.token).await.is_none());
        assert!(sessions.get(active.token).await.is_some());
        assert!(sessions.get(fresh.token).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_is_not_resumed() {
        let sessions = Sessions::new(TTL);
        let s = sessions.create().await;
        tokio::time::advance(TTL).await;
        let resumed = sessions.resume_or_create(Some(s.token)).await;
        assert_ne!(resumed.token, s.token);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn cookieless_visits_do_not_pile_up() {
        let sessions = Sessions::new(Duration::ZERO);
        for _ in 0..100 {
            sessions.resume_or_create(None).await;
        }
        assert_eq!(sessions.len().await, 1);
    }
}
