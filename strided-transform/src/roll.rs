//! Circular shift.

use log::debug;
use strided_kernel::{cat_with_grain, contiguous_with_grain};

use crate::config::TransformConfig;
use crate::dim_bitset::wrap_dim;
use crate::{Element, Result, StridedArray, StridedError, StridedView};

/// Shift elements of `src` by `shifts[i]` along `dims[i]`, wrapping around.
///
/// A positive shift moves elements towards higher indices. With an empty
/// `dims` and a single shift the array is rolled as if flattened in
/// row-major order. The result is a fresh row-major array.
///
/// # Example
///
/// ```rust
/// use strided_transform::{roll, StridedArray};
///
/// let a = StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
/// assert_eq!(roll(&a.view(), &[1], &[1]).unwrap().to_vec(), vec![3, 1, 2, 6, 4, 5]);
/// assert_eq!(roll(&a.view(), &[1], &[]).unwrap().to_vec(), vec![6, 1, 2, 3, 4, 5]);
/// ```
pub fn roll<T: Element>(
    src: &StridedView<T>,
    shifts: &[isize],
    dims: &[isize],
) -> Result<StridedArray<T>> {
    roll_with(src, shifts, dims, &TransformConfig::default())
}

/// [`roll`] with an explicit copy grain size.
pub fn roll_with<T: Element>(
    src: &StridedView<T>,
    shifts: &[isize],
    dims: &[isize],
    config: &TransformConfig,
) -> Result<StridedArray<T>> {
    if dims.len() == 1 && shifts.len() == 1 {
        let axis = wrap_dim(dims[0], src.ndim())?;
        debug!("roll: single axis {} by {}", axis, shifts[0]);
        return roll_axis(src, shifts[0], axis, config);
    }
    roll_multi(src, shifts, dims, config)
}

/// Single-axis roll as the concatenation of `[start, size)` and `[0, start)`.
fn roll_axis<T: Element>(
    src: &StridedView<T>,
    shift: isize,
    axis: usize,
    config: &TransformConfig,
) -> Result<StridedArray<T>> {
    if src.is_empty() {
        debug!("roll: empty input of shape {:?}", src.dims());
        return contiguous_with_grain(src, config.copy_grain_size);
    }
    let size = src.dims()[axis] as isize;
    // in [0, size) for any sign of shift
    let start = ((size - shift.rem_euclid(size)) % size) as usize;
    let size = size as usize;
    let tail = src.narrow(axis, start, size - start)?;
    let head = src.narrow(axis, 0, start)?;
    cat_with_grain(&[tail, head], axis, config.copy_grain_size)
}

fn roll_multi<T: Element>(
    src: &StridedView<T>,
    shifts: &[isize],
    dims: &[isize],
    config: &TransformConfig,
) -> Result<StridedArray<T>> {
    if dims.is_empty() && shifts.len() == 1 {
        debug!("roll: flattened by {}", shifts[0]);
        let flat = contiguous_with_grain(src, config.copy_grain_size)?;
        let numel = flat.len();
        let rolled = {
            let line = flat.view().reshape(&[numel])?;
            roll_axis(&line, shifts[0], 0, config)?
        };
        return rolled.into_reshaped(src.dims());
    }

    if shifts.is_empty() || shifts.len() != dims.len() {
        return Err(StridedError::ShiftDimsMismatch {
            shifts: shifts.len(),
            dims: dims.len(),
        });
    }
    let axes = dims
        .iter()
        .map(|&d| wrap_dim(d, src.ndim()))
        .collect::<Result<Vec<_>>>()?;

    debug!("roll: {} axes {:?} by {:?}", axes.len(), axes, shifts);
    let mut current = roll_axis(src, shifts[0], axes[0], config)?;
    for (&shift, &axis) in shifts.iter().zip(&axes).skip(1) {
        current = roll_axis(&current.view(), shift, axis, config)?;
    }
    Ok(current)
}
