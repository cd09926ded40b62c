//! The boundary through which posts and comments talk to the remote
//! service.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Error;
use crate::models::{CommentData, Replies};
use crate::options::{CommentOptions, CommentSort};

/// Form parameters accompanying a mutation.
pub type Params = Vec<(&'static str, String)>;

/// Shared handle to a dispatcher. Controllers keep one of these and never
/// own the dispatcher itself.
pub type SharedDispatch = Arc<dyn Dispatch>;

/// Remote calls made on behalf of posts and comments.
///
/// [`crate::Client`] implements this trait over HTTP. Implement it
/// yourself to stub out the network, e.g. in tests. Implementations are
/// expected to be stateless from the model's point of view; retry
/// policy, if any, lives behind this boundary.
pub trait Dispatch: Send + Sync {
    /// Fetch the comment tree of the link with the given id.
    ///
    /// `subreddit` scopes the lookup when known. The returned [`Replies`]
    /// carries the loaded forest plus the ids of any comments elided
    /// behind "more" stubs.
    fn comments(
        &self,
        link_id: &str,
        subreddit: Option<&str>,
        options: &CommentOptions,
    ) -> Result<Replies, Error>;

    /// Submit the named mutation for the thing addressed by `fullname`.
    ///
    /// Returns the structured response body when the endpoint produces
    /// one; endpoints that answer with an empty body yield `None`.
    fn submit(
        &self,
        operation: &'static str,
        fullname: &str,
        params: Params,
    ) -> Result<Option<Value>, Error>;

    /// Fetch a batch of comments that were elided from a previously
    /// fetched tree.
    ///
    /// `more_id` is the id of the stub being replaced, when known.
    fn more_children(
        &self,
        link_fullname: &str,
        children: &[String],
        limit_children: bool,
        sort: CommentSort,
        more_id: Option<&str>,
    ) -> Result<Vec<CommentData>, Error>;
}
