//! Axis reversal, circular shift and plane rotation over strided arrays.
//!
//! Every operation accepts any [`StridedView`], whatever its layout
//! (transposed, narrowed, negative or zero strides), and returns a freshly
//! allocated [`StridedArray`] that never aliases the input.
//!
//! # Operations
//!
//! - [`flip`], [`fliplr`], [`flipud`]: Reverse one or more axes
//! - [`roll`]: Circular shift along axes, or over the flattened array
//! - [`rot90`]: Rotate by multiples of 90 degrees in a two-axis plane
//! - [`atleast_1d`], [`atleast_2d`], [`atleast_3d`]: Pad rank with size-1 axes
//! - [`TypedArray`]: The same operations on an element type chosen at run time
//!
//! Each operation has a `*_with` form taking a [`TransformConfig`] that
//! selects the flip kernel and the parallel grain sizes.
//!
//! # Example
//!
//! ```rust
//! use strided_transform::{flip, roll, rot90, StridedArray};
//!
//! let a = StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! let v = a.view();
//!
//! assert_eq!(flip(&v, &[0, 1]).unwrap().to_vec(), vec![6, 5, 4, 3, 2, 1]);
//! assert_eq!(roll(&v, &[1], &[1]).unwrap().to_vec(), vec![3, 1, 2, 6, 4, 5]);
//! assert_eq!(rot90(&v, 1, &[0, 1]).unwrap().to_vec(), vec![3, 6, 2, 5, 1, 4]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): Run kernels on the rayon thread pool.

pub mod atleast;
pub mod config;
pub mod dim_bitset;
pub mod flip;
pub mod roll;
pub mod rot90;
pub mod strides;
pub mod typed;

pub use atleast::{atleast_1d, atleast_1d_all, atleast_2d, atleast_2d_all, atleast_3d, atleast_3d_all};
pub use config::{
    FlipKernelKind, TransformConfig, DEFAULT_COPY_GRAIN_SIZE, DEFAULT_GATHER_GRAIN_SIZE,
    DEFAULT_RECOMPUTE_GRAIN_SIZE,
};
pub use dim_bitset::{wrap_dim, DimBitset, DIM_BITSET_SIZE};
pub use flip::{
    build_indices, flip, flip_with, fliplr, fliplr_with, flipud, flipud_with, FlipKernel, GatherFlip,
    RecomputeFlip,
};
pub use roll::{roll, roll_with};
pub use rot90::{rot90, rot90_with};
pub use strides::contiguous_strides;
pub use typed::{OpaqueArray, QuantParams, QuantizedArray, TypedArray};

pub use strided_traits::{QInt32, QInt8, QUInt2x4, QUInt4x2, QUInt8};
pub use strided_view::{
    col_major_strides, row_major_strides, Element, Result, ScalarType, StridedArray, StridedError,
    StridedView, StridedViewMut,
};
