//! Rotation by multiples of 90 degrees in a plane of two axes.

use log::debug;
use strided_kernel::contiguous_with_grain;

use crate::config::TransformConfig;
use crate::dim_bitset::wrap_dim;
use crate::flip::flip_with;
use crate::{Element, Result, StridedArray, StridedError, StridedView};

/// Rotate `src` by `k * 90` degrees from `dims[0]` towards `dims[1]`.
///
/// `k` may be any integer; only `k mod 4` matters. Odd `k` returns an array
/// whose two plane axes are swapped by metadata, so its layout is a
/// transposed row-major buffer rather than a plain row-major one.
///
/// # Example
///
/// ```rust
/// use strided_transform::{rot90, StridedArray};
///
/// let a = StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
/// let r = rot90(&a.view(), 1, &[0, 1]).unwrap();
/// assert_eq!(r.dims(), &[3, 2]);
/// assert_eq!(r.to_vec(), vec![3, 6, 2, 5, 1, 4]);
/// ```
pub fn rot90<T: Element>(src: &StridedView<T>, k: i64, dims: &[isize]) -> Result<StridedArray<T>> {
    rot90_with(src, k, dims, &TransformConfig::default())
}

/// [`rot90`] with explicit flip kernel and grain sizes.
pub fn rot90_with<T: Element>(
    src: &StridedView<T>,
    k: i64,
    dims: &[isize],
    config: &TransformConfig,
) -> Result<StridedArray<T>> {
    let rank = src.ndim();
    if dims.len() != 2 {
        return Err(StridedError::RotationDimsCount(dims.len()));
    }
    if rank < 2 {
        return Err(StridedError::RankTooSmall {
            op: "rot90",
            rank,
            min: 2,
        });
    }
    // Equal axes, or a positive and negative index naming the same axis.
    if dims[0] == dims[1] || dims[0].abs_diff(dims[1]) == rank {
        return Err(StridedError::InvalidRotationDims {
            dim0: dims[0],
            dim1: dims[1],
            rank,
        });
    }
    let d0 = wrap_dim(dims[0], rank)?;
    let d1 = wrap_dim(dims[1], rank)?;

    let k = k.rem_euclid(4);
    debug!("rot90: k = {} in plane ({}, {}) of shape {:?}", k, d0, d1, src.dims());
    match k {
        1 => {
            let mut out = flip_with(src, &[dims[1]], config)?;
            out.transpose_in_place(d0, d1)?;
            Ok(out)
        }
        2 => flip_with(src, dims, config),
        3 => {
            let mut out = flip_with(src, &[dims[0]], config)?;
            out.transpose_in_place(d0, d1)?;
            Ok(out)
        }
        _ => contiguous_with_grain(src, config.copy_grain_size),
    }
}
