//! Options for comment tree fetches.

use std::fmt;
use std::str::FromStr;

use crate::error::{self, Error, Validation};

/// Sort orders accepted for comment trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSort {
    /// Best comments first
    Confidence,
    /// Highest scoring first
    Top,
    /// Newest first
    New,
    /// Most controversial first
    Controversial,
    /// Oldest first
    Old,
    /// Random order
    Random,
    /// Question and answer threads
    Qa,
    /// Live threads
    Live,
}

impl CommentSort {
    /// Every accepted sort order.
    pub const ALL: [CommentSort; 8] = [
        CommentSort::Confidence,
        CommentSort::Top,
        CommentSort::New,
        CommentSort::Controversial,
        CommentSort::Old,
        CommentSort::Random,
        CommentSort::Qa,
        CommentSort::Live,
    ];

    /// The name the API expects.
    pub fn as_str(self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Random => "random",
            CommentSort::Qa => "qa",
            CommentSort::Live => "live",
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommentSort::ALL
            .iter()
            .copied()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| Validation::UnknownSort(s.to_string()).into())
    }
}

/// Options for a comment tree fetch.
///
/// The defaults match what the service assumes when a parameter is
/// omitted. `context` and `truncate` have documented ranges that are
/// checked before the request is dispatched.
#[derive(Debug, Clone)]
pub struct CommentOptions {
    /// Sort order of the returned tree
    pub sort: CommentSort,
    /// How many parent comments to include around a target, 0 to 8
    pub context: u32,
    /// Truncate the tree after this many comments, 0 (no limit) to 50
    pub truncate: u32,
    /// Include edited comments' current text
    pub show_edits: bool,
    /// Include "more comments" stubs in the tree
    pub show_more: bool,
    /// Nest replies under their parents rather than returning a flat list
    pub threaded: bool,
    /// Maximum depth of the returned tree
    pub depth: Option<u32>,
    /// Maximum number of comments to return
    pub limit: Option<u32>,
    /// Expand details of referenced subreddits
    pub sr_detail: bool,
}

impl Default for CommentOptions {
    fn default() -> Self {
        CommentOptions {
            sort: CommentSort::New,
            context: 3,
            truncate: 0,
            show_edits: false,
            show_more: true,
            threaded: true,
            depth: None,
            limit: None,
            sr_detail: false,
        }
    }
}

impl CommentOptions {
    /// Check the documented parameter ranges, reporting the first
    /// violation. Nothing is clamped.
    pub fn validate(&self) -> Result<(), Error> {
        error::check_range("context", i64::from(self.context), 0, 8)?;
        error::check_range("truncate", i64::from(self.truncate), 0, 50)?;
        Ok(())
    }
}
