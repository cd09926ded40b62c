#![warn(rust_2018_idioms)]

//! # Typed client-side models for the Reddit API
//!
//! ## What
//!
//! This crate models posts and comments as stateful objects backed by a
//! shared dispatcher. A [`Post`] lazily fetches and caches its comment
//! tree, refreshing it once the cached copy is older than
//! [`COMMENT_TTL`], and both posts and comments expose the full set of
//! moderation and author actions (delete, hide, lock, report, sticky,
//! suggested sort, …) through the [`Content`] trait.
//!
//! Every mutation comes in two forms: a blocking call that surfaces
//! validation and remote failures, and a `*_async` twin that runs the
//! same call on a background task and discards its outcome. Mutations
//! never update the local copy; re-import a thing from a fresh listing
//! to observe its new state.
//!
//! ## How
//!
//! Remote calls go through the [`Dispatch`] trait. [`Client`] implements
//! it over HTTP; tests and embedders can substitute their own.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use orangered::url::Url;
//! use orangered::{Client, CommentOptions, Post, SharedDispatch};
//!
//! # fn main() -> Result<(), orangered::Error> {
//! let base_url: Url = orangered::URL.parse().expect("base url is invalid");
//! let dispatch: SharedDispatch = Arc::new(Client::new(base_url)?);
//!
//! let post = Post::from_fullname(Arc::clone(&dispatch), "t3_abc123");
//! for comment in post.fetch_comments(&CommentOptions::default())? {
//!     println!("{}: {}", comment.author, comment.body);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Check out the terminal client that is part of the workspace
//! (orangered-cli) for a fuller example.
//!
//! ## License
//!
//! This project is dual licenced under:
//!
//! - Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license (<http://opensource.org/licenses/MIT>)

mod background;
mod cache;
pub mod client;
pub mod comment;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod options;
pub mod post;

pub use cache::COMMENT_TTL;
pub use client::Client;
pub use comment::Comment;
pub use content::{Content, Report, COMMENT_PREFIX, LINK_PREFIX};
pub use dispatch::{Dispatch, Params, SharedDispatch};
pub use error::{Error, Validation};
pub use options::{CommentOptions, CommentSort};
pub use post::Post;
pub use url;

/// URL of the public listing API. Useful as `base_url` to `Client`
pub const URL: &str = "https://www.reddit.com/";

/// URL of the authenticated API. Mutating calls must go through here
pub const OAUTH_URL: &str = "https://oauth.reddit.com/";
