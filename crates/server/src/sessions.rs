use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process bearer token registry.
///
/// Tokens are random UUIDs handed out at register/login time and dropped at
/// logout or restart. There is no expiry.
#[derive(Debug, Default)]
pub struct Sessions {
    inner: RwLock<HashMap<String, i32>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for `user_id`.
    pub async fn create(&self, user_id: i32) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner.write().await.insert(token.clone(), user_id);
        token
    }

    pub async fn user_id(&self, token: &str) -> Option<i32> {
        self.inner.read().await.get(token).copied()
    }

    /// Drop a token. Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_resolves_until_removed() {
        let sessions = Sessions::new();
        let token = sessions.create(7).await;
        assert_eq!(sessions.user_id(&token).await, Some(7));

        assert!(sessions.remove(&token).await);
        assert_eq!(sessions.user_id(&token).await, None);
        assert!(!sessions.remove(&token).await);
    }

    #[tokio::test]
    async fn tokens_are_distinct_per_session() {
        let sessions = Sessions::new();
        let first = sessions.create(1).await;
        let second = sessions.create(1).await;
        assert_ne!(first, second);
    }
}
