//! One results controller per browser, found by a random cookie. Everything is
//! kept in memory and forgotten on restart.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::debug;

use crate::controller::{ResultsController, SharedController};

pub const SESSION_COOKIE: &str = "sixthsense-session";

pub fn new_session_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[derive(Debug)]
struct Session {
    controller: SharedController,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct Sessions {
    max_idle: Duration,
    map: Mutex<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            max_idle,
            map: Mutex::new(HashMap::new()),
        }
    }

    /// The controller for the session, creating a fresh one if the id isn't
    /// known (new visitor, or the server restarted).
    pub async fn get_or_create(&self, id: &str) -> SharedController {
        let now = Instant::now();
        let mut map = self.map.lock().await;

        if let Some(session) = map.get_mut(id) {
            session.last_seen = now;
            return session.controller.clone();
        }

        let before = map.len();
        map.retain(|_, session| now.duration_since(session.last_seen) < self.max_idle);
        if map.len() != before {
            debug!("evicted {} idle sessions", before - map.len());
        }

        let controller = ResultsController::shared();
        map.insert(
            id.to_string(),
            Session {
                controller: controller.clone(),
                last_seen: now,
            },
        );
        controller
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.map.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn same_id_same_controller() {
        let sessions = Sessions::new(Duration::from_secs(60));
        let a = sessions.get_or_create("a").await;
        let a_again = sessions.get_or_create("a").await;
        let b = sessions.get_or_create("b").await;

        assert!(Arc::ptr_eq(&a, &a_again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(sessions.len().await, 2);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let sessions = Sessions::new(Duration::from_millis(20));
        sessions.get_or_create("old").await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        sessions.get_or_create("new").await;
        assert_eq!(sessions.len().await, 1);
    }

    #[test]
    fn ids_are_hex() {
        let id = new_session_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
