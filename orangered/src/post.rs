//! The post controller.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::cache::{CommentCache, COMMENT_TTL};
use crate::comment::Comment;
use crate::content::{self, Content, LINK_PREFIX};
use crate::dispatch::SharedDispatch;
use crate::error::Error;
use crate::models::PostData;
use crate::options::{CommentOptions, CommentSort};

/// A link or self post.
///
/// Holds the attributes imported from a listing plus a private cache of
/// the post's comment tree. The cache is only ever written by the post's
/// own fetches and is dropped with the post.
pub struct Post {
    dispatch: SharedDispatch,
    /// Opaque id, e.g. `abc123`
    pub id: String,
    /// Globally unique identifier, e.g. `t3_abc123`
    pub fullname: String,
    /// Subreddit the post lives in
    pub subreddit: String,
    /// Post title
    pub title: String,
    /// Author username
    pub author: String,
    /// Self text, empty for link posts
    pub body: String,
    /// Linked URL, for link posts
    pub url: Option<String>,
    /// Site-relative permalink
    pub permalink: String,
    /// When the post was created
    pub created: Option<DateTime<Utc>>,
    /// When the post was last edited
    pub edited: Option<DateTime<Utc>>,
    /// Net score
    pub score: i64,
    /// Up vote count
    pub up_votes: i64,
    /// Down vote count
    pub down_votes: i64,
    /// Whether a moderator removed the post
    pub removed: bool,
    /// Whether the post was flagged as spam
    pub spam: bool,
    /// Whether the post is marked not safe for work
    pub nsfw: bool,
    cache: Mutex<CommentCache>,
}

impl Post {
    /// Build a post from a listing payload.
    pub fn from_data(dispatch: SharedDispatch, data: &PostData) -> Self {
        let mut post = Post::from_fullname(dispatch, &data.name);
        post.import(data);
        post
    }

    /// Build a post from raw attributes, e.g. a local representation
    /// assembled before submission. `fullname` falls back to the
    /// prefixed id when not given.
    pub fn new(
        dispatch: SharedDispatch,
        subreddit: &str,
        title: &str,
        author: &str,
        id: Option<&str>,
        fullname: Option<&str>,
    ) -> Self {
        let mut post = Post::empty(dispatch);
        post.id = id.unwrap_or_default().to_string();
        post.fullname = content::fullname_or(fullname, LINK_PREFIX, id);
        post.subreddit = subreddit.to_string();
        post.title = title.to_string();
        post.author = author.to_string();
        post
    }

    /// Build a lazy handle from a fullname alone, enough to target
    /// mutation and comment calls before any attribute is loaded.
    pub fn from_fullname(dispatch: SharedDispatch, fullname: &str) -> Self {
        let mut post = Post::empty(dispatch);
        post.id = fullname
            .strip_prefix(LINK_PREFIX)
            .unwrap_or_default()
            .to_string();
        post.fullname = fullname.to_string();
        post
    }

    fn empty(dispatch: SharedDispatch) -> Self {
        Post {
            dispatch,
            id: String::new(),
            fullname: String::new(),
            subreddit: String::new(),
            title: String::new(),
            author: String::new(),
            body: String::new(),
            url: None,
            permalink: String::new(),
            created: None,
            edited: None,
            score: 0,
            up_votes: 0,
            down_votes: 0,
            removed: false,
            spam: false,
            nsfw: false,
            cache: Mutex::new(CommentCache::new(COMMENT_TTL)),
        }
    }

    /// Overwrite every tracked attribute from a listing payload.
    /// Importing the same payload twice yields the same state; partial
    /// imports do not exist.
    pub fn import(&mut self, data: &PostData) {
        self.id = data.id.clone();
        self.fullname = data.name.clone();
        self.subreddit = data.subreddit.clone();
        self.title = data.title.clone();
        self.author = data.author.clone();
        self.body = data.selftext.clone();
        self.url = data.url.clone();
        self.permalink = data.permalink.clone();
        self.created = Some(data.created_utc);
        self.edited = data.edited;
        self.score = data.score;
        self.up_votes = data.ups;
        self.down_votes = data.downs;
        self.removed = data.removed;
        self.spam = data.spam;
        self.nsfw = data.over18;
    }

    /// Change how long fetched comment trees are served before a passive
    /// read refetches. Defaults to [`COMMENT_TTL`].
    pub fn set_comment_ttl(&self, ttl: Duration) {
        self.cache.lock().unwrap().set_ttl(ttl);
    }

    /// The post's comment tree, served from cache while fresh.
    ///
    /// Refetches with default options when the cache is stale or was
    /// never populated. If the refetch fails but an earlier tree exists,
    /// that tree is returned unchanged and its fetch time is not
    /// advanced; with no earlier tree the failure propagates.
    pub fn comments(&self) -> Result<Vec<Comment>, Error> {
        {
            let cache = self.cache.lock().unwrap();
            if cache.is_fresh(Instant::now()) {
                return Ok(cache.tree().to_vec());
            }
        }

        match self.fetch_comments(&CommentOptions::default()) {
            Ok(tree) => Ok(tree),
            Err(err) => {
                let cache = self.cache.lock().unwrap();
                if cache.is_populated() {
                    Ok(cache.tree().to_vec())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Fetch the comment tree, bypassing the cache window.
    ///
    /// A successful fetch replaces the whole cached tree and restarts
    /// the window. On failure the existing cache is left untouched and
    /// the error propagates. The cache lock is not held across the
    /// dispatch call; of two concurrent fetches, the last one to finish
    /// wins.
    pub fn fetch_comments(&self, options: &CommentOptions) -> Result<Vec<Comment>, Error> {
        options.validate()?;

        let subreddit = if self.subreddit.is_empty() {
            None
        } else {
            Some(self.subreddit.as_str())
        };
        let replies = self.dispatch.comments(&self.id, subreddit, options)?;

        let tree: Vec<Comment> = replies
            .comments
            .iter()
            .map(|data| Comment::from_data(Arc::clone(&self.dispatch), data))
            .collect();

        self.cache.lock().unwrap().store(tree.clone(), Instant::now());
        Ok(tree)
    }

    /// Fetch a batch of comments that were elided from a fetched tree
    /// behind a "more" stub, up to 100 ids at a time.
    ///
    /// The result is returned as-is; it is not merged into the cached
    /// tree.
    pub fn more_children(
        &self,
        children: &[String],
        limit_children: bool,
        sort: CommentSort,
        more_id: Option<&str>,
    ) -> Result<Vec<Comment>, Error> {
        let batch =
            self.dispatch
                .more_children(&self.fullname, children, limit_children, sort, more_id)?;
        Ok(batch
            .iter()
            .map(|data| Comment::from_data(Arc::clone(&self.dispatch), data))
            .collect())
    }

    /// Build a local reply to this post, ready for submission.
    pub fn comment(&self, author: &str, body: &str) -> Comment {
        Comment::new(
            Arc::clone(&self.dispatch),
            &self.subreddit,
            author,
            body,
            &self.fullname,
            None,
            None,
        )
    }
}

impl Content for Post {
    fn dispatch(&self) -> &SharedDispatch {
        &self.dispatch
    }

    fn fullname(&self) -> &str {
        &self.fullname
    }

    fn subreddit(&self) -> &str {
        &self.subreddit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Dispatch, Params};
    use crate::models::{CommentData, Replies};
    use serde_json::Value;

    struct Null;

    impl Dispatch for Null {
        fn comments(
            &self,
            _link_id: &str,
            _subreddit: Option<&str>,
            _options: &CommentOptions,
        ) -> Result<Replies, Error> {
            Ok(Replies::default())
        }

        fn submit(
            &self,
            _operation: &'static str,
            _fullname: &str,
            _params: Params,
        ) -> Result<Option<Value>, Error> {
            Ok(None)
        }

        fn more_children(
            &self,
            _link_fullname: &str,
            _children: &[String],
            _limit_children: bool,
            _sort: CommentSort,
            _more_id: Option<&str>,
        ) -> Result<Vec<CommentData>, Error> {
            Ok(Vec::new())
        }
    }

    fn dispatch() -> SharedDispatch {
        Arc::new(Null)
    }

    #[test]
    fn fullname_derived_from_id() {
        let post = Post::new(dispatch(), "rust", "A title", "ferris", Some("abc"), None);
        assert_eq!(post.fullname, "t3_abc");
        assert_eq!(post.id, "abc");
    }

    #[test]
    fn explicit_fullname_wins() {
        let post = Post::new(
            dispatch(),
            "rust",
            "A title",
            "ferris",
            Some("abc"),
            Some("t3_other"),
        );
        assert_eq!(post.fullname, "t3_other");
    }

    #[test]
    fn lazy_handle_knows_its_id() {
        let post = Post::from_fullname(dispatch(), "t3_abc123");
        assert_eq!(post.id, "abc123");
        assert_eq!(post.fullname, "t3_abc123");
        assert!(post.title.is_empty());
    }

    #[test]
    fn reply_points_at_the_post() {
        let post = Post::new(dispatch(), "rust", "A title", "ferris", Some("abc"), None);
        let reply = post.comment("someone", "hello");
        assert_eq!(reply.parent_fullname, "t3_abc");
        assert_eq!(reply.subreddit, "rust");
        assert_eq!(reply.body, "hello");
    }
}
