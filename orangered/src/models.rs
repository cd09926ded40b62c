//! Wire format of the listing API.
//!
//! Everything the API returns is a kinded [`Thing`] envelope. The structs
//! here map the payloads this crate consumes; the controllers in
//! [`crate::post`] and [`crate::comment`] are built from them and keep
//! their own copy of the fields they track.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Kind tag of a comment thing.
pub const KIND_COMMENT: &str = "t1";
/// Kind tag of a link post thing.
pub const KIND_LINK: &str = "t3";
/// Kind tag of a "more comments" stub.
pub const KIND_MORE: &str = "more";

/// A kinded envelope wrapping every payload the API returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    /// Kind tag, e.g. `t1`, `t3`, `more` or `Listing`
    pub kind: String,
    /// The wrapped payload
    #[serde(default)]
    pub data: Value,
}

/// Contents of a `Listing` thing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    /// Cursor for the next slice, when there is one
    #[serde(default)]
    pub after: Option<String>,
    /// Cursor for the previous slice, when there is one
    #[serde(default)]
    pub before: Option<String>,
    /// The listed things
    #[serde(default)]
    pub children: Vec<Thing>,
}

/// A link post as returned in a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    pub id: String,
    /// Fullname, e.g. `t3_abc123`
    pub name: String,
    pub subreddit: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: Option<String>,
    pub permalink: String,
    #[serde(deserialize_with = "epoch_seconds")]
    pub created_utc: DateTime<Utc>,
    /// `false` on the wire when the post was never edited
    #[serde(default, deserialize_with = "edited_timestamp")]
    pub edited: Option<DateTime<Utc>>,
    pub score: i64,
    pub ups: i64,
    pub downs: i64,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub spam: bool,
    #[serde(default, rename = "over_18")]
    pub over18: bool,
    #[serde(default)]
    pub num_comments: u64,
}

/// A comment as returned in a comment tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    pub id: String,
    /// Fullname, e.g. `t1_def456`
    pub name: String,
    #[serde(default)]
    pub subreddit: String,
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(deserialize_with = "epoch_seconds")]
    pub created_utc: DateTime<Utc>,
    /// `false` on the wire when the comment was never edited
    #[serde(default, deserialize_with = "edited_timestamp")]
    pub edited: Option<DateTime<Utc>>,
    pub score: i64,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub spam: bool,
    /// Fullname of the thing this comment replies to
    pub parent_id: String,
    /// Fullname of the post the comment thread hangs off
    #[serde(default)]
    pub link_id: String,
    /// Distance from the thread root
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub replies: Replies,
}

/// Stub standing in for comments that were not returned with the tree.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
    /// How many comments the stub covers
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_id: String,
    /// Ids of the elided comments
    #[serde(default)]
    pub children: Vec<String>,
}

/// Children of a comment or of a comment listing, partitioned into the
/// comments that were returned and the ids elided behind "more" stubs.
#[derive(Debug, Clone, Default)]
pub struct Replies {
    /// Comments present in the response
    pub comments: Vec<CommentData>,
    /// Ids of comments that must be fetched separately
    pub more: Vec<String>,
}

impl Replies {
    /// Partition the children of a listing into comments and stub ids.
    /// Things of any other kind are skipped.
    pub fn from_listing(listing: ListingData) -> Result<Replies, serde_json::Error> {
        let mut replies = Replies::default();
        for child in listing.children {
            match child.kind.as_str() {
                KIND_COMMENT => {
                    let comment: CommentData = serde_json::from_value(child.data)?;
                    replies.comments.push(comment);
                }
                KIND_MORE => {
                    let more: MoreData = serde_json::from_value(child.data)?;
                    replies.more.extend(more.children);
                }
                _ => {}
            }
        }
        Ok(replies)
    }
}

impl<'de> Deserialize<'de> for Replies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The API sends an empty string in place of the listing when a
        // comment has no replies.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Listing(Thing),
            Empty(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Listing(thing) => {
                let listing: ListingData =
                    serde_json::from_value(thing.data).map_err(de::Error::custom)?;
                Replies::from_listing(listing).map_err(de::Error::custom)
            }
            Raw::Empty(_) => Ok(Replies::default()),
        }
    }
}

/// Error reported inside a `{"json": {"errors": [[code, message, field]]}}`
/// response envelope, if any.
pub fn api_errors(value: &Value) -> Option<String> {
    let first = value.get("json")?.get("errors")?.as_array()?.first()?;
    let parts = first.as_array()?;
    let code = parts.first().and_then(Value::as_str).unwrap_or("unknown");
    let message = parts.get(1).and_then(Value::as_str).unwrap_or("");

    if message.is_empty() {
        Some(code.to_string())
    } else {
        Some(format!("{}: {}", code, message))
    }
}

/// Deserialize an epoch timestamp sent as a float of seconds.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    timestamp(seconds).ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", seconds)))
}

/// Deserialize the `edited` field, which is `false` for things that were
/// never edited and an epoch timestamp otherwise.
fn edited_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Seconds(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Flag(_) => Ok(None),
        Raw::Seconds(seconds) => timestamp(seconds)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", seconds))),
    }
}

fn timestamp(seconds: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds.trunc() as i64, (seconds.fract() * 1e9) as u32)
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_comment_with_nested_replies() {
        let comment: CommentData = serde_json::from_value(json!({
            "id": "def456",
            "name": "t1_def456",
            "subreddit": "rust",
            "author": "ferris",
            "body": "nice crate",
            "body_html": null,
            "permalink": "/r/rust/comments/abc123/title/def456/",
            "created_utc": 1502306014.0,
            "edited": false,
            "score": 12,
            "ups": 13,
            "downs": 1,
            "parent_id": "t3_abc123",
            "link_id": "t3_abc123",
            "depth": 0,
            "replies": {
                "kind": "Listing",
                "data": {
                    "children": [
                        {
                            "kind": "t1",
                            "data": {
                                "id": "ghi789",
                                "name": "t1_ghi789",
                                "author": "someone",
                                "body": "agreed",
                                "created_utc": 1502306020.0,
                                "edited": 1502306100.0,
                                "score": 2,
                                "parent_id": "t1_def456",
                                "depth": 1,
                                "replies": ""
                            }
                        },
                        {
                            "kind": "more",
                            "data": {
                                "count": 3,
                                "parent_id": "t1_def456",
                                "children": ["jkl012", "mno345"]
                            }
                        }
                    ]
                }
            }
        }))
        .expect("comment should parse");

        assert_eq!(comment.name, "t1_def456");
        assert_eq!(comment.replies.comments.len(), 1);
        assert_eq!(comment.replies.more, vec!["jkl012", "mno345"]);

        let reply = &comment.replies.comments[0];
        assert_eq!(reply.parent_id, "t1_def456");
        assert_eq!(reply.depth, 1);
        assert!(reply.edited.is_some());
        assert!(reply.replies.comments.is_empty());
    }

    #[test]
    fn empty_string_means_no_replies() {
        let comment: CommentData = serde_json::from_value(json!({
            "id": "a",
            "name": "t1_a",
            "author": "x",
            "created_utc": 1.0,
            "score": 0,
            "parent_id": "t3_b",
            "replies": ""
        }))
        .expect("comment should parse");

        assert!(comment.replies.comments.is_empty());
        assert!(comment.replies.more.is_empty());
    }

    #[test]
    fn never_edited_is_none() {
        let post: PostData = serde_json::from_value(json!({
            "id": "abc123",
            "name": "t3_abc123",
            "subreddit": "rust",
            "title": "A title",
            "author": "ferris",
            "permalink": "/r/rust/comments/abc123/a_title/",
            "created_utc": 1502306014.5,
            "edited": false,
            "score": 100,
            "ups": 110,
            "downs": 10,
            "over_18": true
        }))
        .expect("post should parse");

        assert!(post.edited.is_none());
        assert!(post.over18);
        assert_eq!(post.created_utc.timestamp(), 1502306014);
    }

    #[test]
    fn envelope_errors_are_extracted() {
        let envelope = json!({
            "json": {
                "errors": [["TOO_LONG", "this is too long", "custom_text"]],
                "data": {}
            }
        });
        assert_eq!(
            api_errors(&envelope).as_deref(),
            Some("TOO_LONG: this is too long")
        );

        let clean = json!({"json": {"errors": [], "data": {}}});
        assert_eq!(api_errors(&clean), None);
    }
}
