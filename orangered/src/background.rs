//! The execution context for fire-and-forget calls.

use futures::executor::ThreadPool;
use lazy_static::lazy_static;

lazy_static! {
    static ref POOL: ThreadPool = ThreadPool::builder()
        .pool_size(2)
        .name_prefix("orangered-bg-")
        .create()
        .expect("failed to start background pool");
}

/// Run `job` on the shared background pool.
///
/// There is no handle back to the job: its outcome is dropped. Callers
/// that need the result must make the call on their own thread instead.
pub(crate) fn spawn<F>(job: F)
where
    F: FnOnce() + Send + 'static,
{
    POOL.spawn_ok(async move { job() });
}
