//! Range-splitting parallel execution.
//!
//! [`parallel_for`] halves a linear index range recursively with
//! `rayon::join`, handing each half a share of the available threads, until
//! a piece is no longer than the grain size or has a single thread left.

use crate::maybe_sync::MaybeSync;

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to data is valid for the
/// lifetime of any parallel operation and that no data races occur
/// (e.g., different threads write to disjoint regions).
pub struct SendPtr<T>(pub *mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    /// Wrap a read-only pointer.
    pub fn from_const(ptr: *const T) -> Self {
        Self(ptr as *mut T)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.0
    }

    #[inline]
    pub fn as_const(self) -> *const T {
        self.0 as *const T
    }
}

/// Run `f(chunk_begin, chunk_end)` over disjoint chunks covering
/// `[begin, end)`.
///
/// Chunks are at least `grain` long unless the whole range is shorter; a
/// grain of 0 is treated as 1. The range runs on the calling thread when it
/// fits in one grain, when the pool has a single thread, or when the
/// `parallel` feature is off. An empty range never calls `f`.
pub fn parallel_for<F>(begin: usize, end: usize, grain: usize, f: F)
where
    F: Fn(usize, usize) + MaybeSync,
{
    if begin >= end {
        return;
    }
    let grain = grain.max(1);

    #[cfg(feature = "parallel")]
    {
        let nthreads = rayon::current_num_threads();
        if end - begin > grain && nthreads > 1 {
            log::trace!(
                "parallel_for: range {}..{} grain {} across {} threads",
                begin,
                end,
                grain,
                nthreads
            );
            split_recursive(begin, end, grain, nthreads, &f);
            return;
        }
    }

    f(begin, end);
}

#[cfg(feature = "parallel")]
fn split_recursive<F>(begin: usize, end: usize, grain: usize, nthreads: usize, f: &F)
where
    F: Fn(usize, usize) + Sync,
{
    let len = end - begin;
    // Each half must still hold at least one grain.
    if nthreads <= 1 || len < 2 * grain {
        f(begin, end);
        return;
    }
    let mid = begin + len / 2;
    let nt_left = nthreads / 2;
    let nt_right = nthreads - nt_left;
    rayon::join(
        || split_recursive(begin, mid, grain, nt_left, f),
        || split_recursive(mid, end, grain, nt_right, f),
    );
}
