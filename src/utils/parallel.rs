//! Shared thread pool for the partitioned vote.
//!
//! Votes are accumulated on a dedicated rayon pool so that estimation does
//! not compete with whatever the caller runs on the global pool.

#[cfg(feature = "parallel")]
use rayon::ThreadPool;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
static THREAD_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// Get or initialize the shared voting pool.
///
/// Returns `None` if the pool could not be built, in which case work runs
/// on the calling thread.
#[cfg(feature = "parallel")]
pub fn get_thread_pool() -> Option<&'static ThreadPool> {
    THREAD_POOL
        .get_or_init(|| {
            match rayon::ThreadPoolBuilder::new()
                .thread_name(|i| format!("agcd-vote-{}", i))
                .build()
            {
                Ok(pool) => Some(pool),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to build voting pool, running serially");
                    None
                }
            }
        })
        .as_ref()
}

/// Execute a parallel operation on the shared voting pool.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match get_thread_pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}

/// Whether partitioned voting is compiled in.
pub const fn parallel_enabled() -> bool {
    cfg!(feature = "parallel")
}
