//! Per-user conversation context cache
//!
//! Holds the two kinds of short-lived context the dispatcher consults
//! between turns: the most recently submitted image (base64) and the
//! accumulated chat history. Entries expire a fixed interval after the
//! last write; an expired entry reads as absent, equivalent to a fresh
//! user.

use std::time::Duration;

use mini_moka::sync::Cache;

/// Role of one utterance in a chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// End-user prompt
    User,
    /// Model reply
    Model,
}

impl Role {
    /// Wire-format role string for the generation API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One role-tagged utterance in a chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// TTL-based cache for per-user image and chat-history context
///
/// Image and history entries are held in separate caches keyed by user
/// id, so the two families can never collide and expire independently.
/// Writes overwrite any prior entry for the same user and restart its
/// time-to-live.
#[derive(Clone)]
pub struct ContextCache {
    images: Cache<String, String>,
    histories: Cache<String, Vec<ChatTurn>>,
}

impl ContextCache {
    /// Create a new cache whose entries live for `ttl` after each write
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            images: Cache::builder().time_to_live(ttl).build(),
            histories: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Look up the cached image for a user
    #[must_use]
    pub fn image(&self, user_id: &str) -> Option<String> {
        self.images.get(&user_id.to_string())
    }

    /// Store a base64 image payload for a user, overwriting any prior one
    pub fn put_image(&self, user_id: &str, image_base64: String) {
        self.images.insert(user_id.to_string(), image_base64);
    }

    /// Drop the cached image for a user
    pub fn remove_image(&self, user_id: &str) {
        self.images.invalidate(&user_id.to_string());
    }

    /// Look up the chat history for a user
    #[must_use]
    pub fn history(&self, user_id: &str) -> Option<Vec<ChatTurn>> {
        self.histories.get(&user_id.to_string())
    }

    /// Store a chat history for a user, resetting its expiry
    pub fn put_history(&self, user_id: &str, history: Vec<ChatTurn>) {
        self.histories.insert(user_id.to_string(), history);
    }

    /// Drop the chat history for a user
    pub fn remove_history(&self, user_id: &str) {
        self.histories.invalidate(&user_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> ContextCache {
        ContextCache::new(Duration::from_secs(90))
    }

    #[test]
    fn absent_user_reads_empty() {
        let cache = cache();
        assert!(cache.image("u1").is_none());
        assert!(cache.history("u1").is_none());
    }

    #[test]
    fn image_write_overwrites() {
        let cache = cache();
        cache.put_image("u1", "first".to_string());
        cache.put_image("u1", "second".to_string());
        assert_eq!(cache.image("u1").as_deref(), Some("second"));
    }

    #[test]
    fn image_and_history_do_not_collide() {
        let cache = cache();
        cache.put_image("u1", "img".to_string());
        cache.put_history("u1", vec![ChatTurn::user("hello")]);

        assert_eq!(cache.image("u1").as_deref(), Some("img"));
        assert_eq!(
            cache.history("u1"),
            Some(vec![ChatTurn::user("hello")])
        );

        cache.remove_image("u1");
        assert!(cache.image("u1").is_none());
        assert!(cache.history("u1").is_some());
    }

    #[test]
    fn users_are_independent() {
        let cache = cache();
        cache.put_image("u1", "img".to_string());
        assert!(cache.image("u2").is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = ContextCache::new(Duration::from_millis(50));
        cache.put_image("u1", "img".to_string());
        cache.put_history("u1", vec![ChatTurn::user("hi")]);

        std::thread::sleep(Duration::from_millis(80));

        assert!(cache.image("u1").is_none());
        assert!(cache.history("u1").is_none());
    }

    #[test]
    fn rewrite_resets_expiry() {
        let cache = ContextCache::new(Duration::from_millis(100));
        cache.put_history("u1", vec![ChatTurn::user("one")]);

        std::thread::sleep(Duration::from_millis(60));
        cache.put_history("u1", vec![ChatTurn::user("one"), ChatTurn::model("two")]);

        std::thread::sleep(Duration::from_millis(60));
        // 120ms after the first write but only 60ms after the rewrite
        assert!(cache.history("u1").is_some());
    }
}
