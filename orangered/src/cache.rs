//! Per-post comment tree cache.

use std::time::{Duration, Instant};

use crate::comment::Comment;

/// How long a fetched comment tree is served before a passive read
/// triggers a refetch.
pub const COMMENT_TTL: Duration = Duration::from_secs(15);

/// The comment tree attached to a post.
///
/// Owned exclusively by its post and only ever written by the post's own
/// fetch. A successful fetch replaces the whole tree; there is no
/// incremental merge. The tree is fresh while `fetched_at` is within
/// `ttl` of now.
pub(crate) struct CommentCache {
    tree: Vec<Comment>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl CommentCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        CommentCache {
            tree: Vec::new(),
            fetched_at: None,
            ttl,
        }
    }

    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        match self.fetched_at {
            Some(at) => now.duration_since(at) < self.ttl,
            None => false,
        }
    }

    /// Whether any fetch ever succeeded. A populated cache may be stale,
    /// but its tree is still servable.
    pub(crate) fn is_populated(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// Replace the whole tree and stamp the fetch time.
    pub(crate) fn store(&mut self, tree: Vec<Comment>, now: Instant) {
        self.tree = tree;
        self.fetched_at = Some(now);
    }

    pub(crate) fn tree(&self) -> &[Comment] {
        &self.tree
    }

    pub(crate) fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_cache_is_stale() {
        let cache = CommentCache::new(COMMENT_TTL);
        assert!(!cache.is_fresh(Instant::now()));
        assert!(!cache.is_populated());
    }

    #[test]
    fn fresh_strictly_within_window() {
        let mut cache = CommentCache::new(COMMENT_TTL);
        let t0 = Instant::now();
        cache.store(Vec::new(), t0);

        assert!(cache.is_fresh(t0));
        assert!(cache.is_fresh(t0 + Duration::from_secs(10)));
        assert!(cache.is_fresh(t0 + Duration::from_millis(14_999)));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(15)));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(20)));
    }

    #[test]
    fn store_restarts_the_window() {
        let mut cache = CommentCache::new(COMMENT_TTL);
        let t0 = Instant::now();
        cache.store(Vec::new(), t0);

        let t20 = t0 + Duration::from_secs(20);
        assert!(!cache.is_fresh(t20));
        cache.store(Vec::new(), t20);
        assert!(cache.is_fresh(t20 + Duration::from_secs(14)));
    }

    #[test]
    fn ttl_is_injectable() {
        let mut cache = CommentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store(Vec::new(), t0);
        assert!(cache.is_fresh(t0 + Duration::from_secs(30)));

        cache.set_ttl(Duration::from_secs(5));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(30)));
    }
}
