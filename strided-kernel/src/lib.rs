//! Iteration engine and data-moving kernels for strided views.
//!
//! # Core pieces
//!
//! - [`parallel_for`]: Split a linear index range into chunks of at least
//!   `grain` elements and run them on the rayon pool
//! - [`StridedIter`]: N-ary iteration over arrays sharing one logical shape,
//!   with per-operand byte strides
//! - [`copy_into`], [`contiguous`], [`cat`]: Element-moving operations built
//!   on the two above
//!
//! # Example
//!
//! ```rust
//! use strided_kernel::{cat, contiguous, StridedArray};
//!
//! let a = StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! let t = a.view().transpose(0, 1).unwrap();
//! let packed = contiguous(&t).unwrap();
//! assert_eq!(packed.data(), &[1, 4, 2, 5, 3, 6]);
//!
//! let joined = cat(&[a.view().narrow(1, 2, 1).unwrap(), a.view().narrow(1, 0, 2).unwrap()], 1).unwrap();
//! assert_eq!(joined.to_vec(), vec![3, 1, 2, 6, 4, 5]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): Run chunks on rayon. Without it every entry point
//!   runs sequentially and [`MaybeSync`] is implemented for all types.

pub mod iter;
pub mod maybe_sync;
pub mod ops;
mod plan;
pub mod threading;

pub use iter::{byte_strides, StridedIter};
pub use maybe_sync::{MaybeSend, MaybeSendSync, MaybeSync};
pub use ops::{cat, cat_with_grain, contiguous, contiguous_with_grain, copy_into, copy_into_with_grain};
pub use threading::{parallel_for, SendPtr};

pub use strided_view::{
    col_major_strides, row_major_strides, Element, Result, ScalarType, StridedArray, StridedError,
    StridedView, StridedViewMut,
};

/// Default minimum chunk length for copy-style kernels.
///
/// Below this many elements a copy runs on the calling thread.
pub const DEFAULT_COPY_GRAIN_SIZE: usize = 1 << 15;
