//! The comment controller.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::content::{self, Content, COMMENT_PREFIX};
use crate::dispatch::SharedDispatch;
use crate::models::CommentData;

/// A comment on a post, or a reply to another comment.
///
/// Comments form an owning tree: each comment owns its `replies`, and
/// `parent_fullname` is a plain identifier for upward navigation, never
/// a pointer back into the tree.
#[derive(Clone)]
pub struct Comment {
    dispatch: SharedDispatch,
    /// Opaque id, e.g. `def456`
    pub id: String,
    /// Globally unique identifier, e.g. `t1_def456`
    pub fullname: String,
    /// Subreddit the comment lives in
    pub subreddit: String,
    /// Author username
    pub author: String,
    /// Comment text
    pub body: String,
    /// Rendered comment text, when the listing carried it
    pub body_html: Option<String>,
    /// Site-relative permalink
    pub permalink: String,
    /// Fullname of the post or comment this comment replies to
    pub parent_fullname: String,
    /// Distance from the thread root
    pub depth: u32,
    /// When the comment was created
    pub created: Option<DateTime<Utc>>,
    /// When the comment was last edited
    pub edited: Option<DateTime<Utc>>,
    /// Net score
    pub score: i64,
    /// Up vote count
    pub up_votes: i64,
    /// Down vote count
    pub down_votes: i64,
    /// Whether a moderator removed the comment
    pub removed: bool,
    /// Whether the comment was flagged as spam
    pub spam: bool,
    /// Replies to this comment, owned by it
    pub replies: Vec<Comment>,
    /// Ids of further replies elided behind a "more" stub
    pub more: Vec<String>,
}

impl Comment {
    /// Build a comment, and its whole reply tree, from a listing
    /// payload.
    pub fn from_data(dispatch: SharedDispatch, data: &CommentData) -> Self {
        let mut comment = Comment::from_fullname(dispatch, &data.name);
        comment.import(data);
        comment
    }

    /// Build a local comment from raw attributes, e.g. before submitting
    /// it as a reply. `fullname` falls back to the prefixed id when not
    /// given.
    pub fn new(
        dispatch: SharedDispatch,
        subreddit: &str,
        author: &str,
        body: &str,
        parent_fullname: &str,
        id: Option<&str>,
        fullname: Option<&str>,
    ) -> Self {
        Comment {
            dispatch,
            id: id.unwrap_or_default().to_string(),
            fullname: content::fullname_or(fullname, COMMENT_PREFIX, id),
            subreddit: subreddit.to_string(),
            author: author.to_string(),
            body: body.to_string(),
            body_html: None,
            permalink: String::new(),
            parent_fullname: parent_fullname.to_string(),
            depth: 0,
            created: None,
            edited: None,
            score: 0,
            up_votes: 0,
            down_votes: 0,
            removed: false,
            spam: false,
            replies: Vec::new(),
            more: Vec::new(),
        }
    }

    /// Build a lazy handle from a fullname alone, enough to target
    /// mutation calls before any attribute is loaded.
    pub fn from_fullname(dispatch: SharedDispatch, fullname: &str) -> Self {
        let id = fullname
            .strip_prefix(COMMENT_PREFIX)
            .unwrap_or_default()
            .to_string();
        Comment {
            dispatch,
            id,
            fullname: fullname.to_string(),
            subreddit: String::new(),
            author: String::new(),
            body: String::new(),
            body_html: None,
            permalink: String::new(),
            parent_fullname: String::new(),
            depth: 0,
            created: None,
            edited: None,
            score: 0,
            up_votes: 0,
            down_votes: 0,
            removed: false,
            spam: false,
            replies: Vec::new(),
            more: Vec::new(),
        }
    }

    /// Overwrite every tracked attribute, including the reply tree, from
    /// a listing payload. Importing the same payload twice yields the
    /// same state.
    pub fn import(&mut self, data: &CommentData) {
        self.id = data.id.clone();
        self.fullname = data.name.clone();
        self.subreddit = data.subreddit.clone();
        self.author = data.author.clone();
        self.body = data.body.clone();
        self.body_html = data.body_html.clone();
        self.permalink = data.permalink.clone();
        self.parent_fullname = data.parent_id.clone();
        self.depth = data.depth;
        self.created = Some(data.created_utc);
        self.edited = data.edited;
        self.score = data.score;
        self.up_votes = data.ups;
        self.down_votes = data.downs;
        self.removed = data.removed;
        self.spam = data.spam;
        self.replies = data
            .replies
            .comments
            .iter()
            .map(|reply| Comment::from_data(Arc::clone(&self.dispatch), reply))
            .collect();
        self.more = data.replies.more.clone();
    }
}

impl Content for Comment {
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
