//! Axis reversal.
//!
//! Two kernels implement the same contract:
//!
//! - [`GatherFlip`]: restrides the source to zero stride on the flipped
//!   axes and gathers through [`strided_kernel::StridedIter`], adding one
//!   precomputed offset table per flipped axis. Cost is
//!   `O(numel * flipped + sum of flipped extents)`.
//! - [`RecomputeFlip`]: decomposes every linear output index against dense
//!   strides and rebuilds the mirrored source offset. Cost is
//!   `O(numel * rank)` with no auxiliary buffers.
//!
//! [`TransformConfig::flip_kernel`] picks one; the gather kernel is the default.

mod gather;
mod recompute;

pub use gather::{build_indices, GatherFlip};
pub use recompute::RecomputeFlip;

use log::debug;
use strided_kernel::contiguous_with_grain;

use crate::config::{FlipKernelKind, TransformConfig};
use crate::dim_bitset::DimBitset;
use crate::{Element, Result, StridedArray, StridedError, StridedView};

/// A strategy for filling a dense output with a flipped copy of a view.
pub trait FlipKernel {
    /// Write `src` reversed along every axis in `dims` into `out`.
    ///
    /// `out` is the row-major buffer of an array shaped like `src`.
    fn flip_into<T: Element>(&self, src: &StridedView<T>, dims: DimBitset, out: &mut [T]) -> Result<()>;
}

fn check_output<T>(src: &StridedView<T>, out: &[T]) -> Result<()> {
    if out.len() != src.len() {
        return Err(StridedError::DataLengthMismatch {
            expected: src.len(),
            found: out.len(),
        });
    }
    Ok(())
}

/// Reverse `src` along `dims`, returning a fresh row-major array.
///
/// Negative axes count from the back. An empty axis list yields a plain copy.
///
/// # Example
///
/// ```rust
/// use strided_transform::{flip, StridedArray};
///
/// let a = StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
/// let f = flip(&a.view(), &[1]).unwrap();
/// assert_eq!(f.to_vec(), vec![3, 2, 1, 6, 5, 4]);
/// ```
pub fn flip<T: Element>(src: &StridedView<T>, dims: &[isize]) -> Result<StridedArray<T>> {
    flip_with(src, dims, &TransformConfig::default())
}

/// [`flip`] with explicit kernel choice and grain sizes.
pub fn flip_with<T: Element>(
    src: &StridedView<T>,
    dims: &[isize],
    config: &TransformConfig,
) -> Result<StridedArray<T>> {
    let bits = DimBitset::from_dims(dims, src.ndim())?;

    if src.is_empty() {
        debug!("flip: empty input of shape {:?}", src.dims());
        return Ok(StridedArray::row_major(src.dims()));
    }
    if bits.is_empty() {
        debug!("flip: no axes selected, copying shape {:?}", src.dims());
        return contiguous_with_grain(src, config.copy_grain_size);
    }

    debug!(
        "flip: axes {:?} of shape {:?} via {:?} kernel",
        bits.iter().collect::<Vec<_>>(),
        src.dims(),
        config.flip_kernel
    );
    let mut out = StridedArray::<T>::row_major(src.dims());
    match config.flip_kernel {
        FlipKernelKind::Gather => {
            GatherFlip::new(config.gather_grain_size).flip_into(src, bits, out.data_mut())?
        }
        FlipKernelKind::Recompute => {
            RecomputeFlip::new(config.recompute_grain_size).flip_into(src, bits, out.data_mut())?
        }
    }
    Ok(out)
}

/// Reverse the column axis (axis 1). Requires rank >= 2.
pub fn fliplr<T: Element>(src: &StridedView<T>) -> Result<StridedArray<T>> {
    fliplr_with(src, &TransformConfig::default())
}

pub fn fliplr_with<T: Element>(src: &StridedView<T>, config: &TransformConfig) -> Result<StridedArray<T>> {
    if src.ndim() < 2 {
        return Err(StridedError::RankTooSmall {
            op: "fliplr",
            rank: src.ndim(),
            min: 2,
        });
    }
    flip_with(src, &[1], config)
}

/// Reverse the row axis (axis 0). Requires rank >= 1.
pub fn flipud<T: Element>(src: &StridedView<T>) -> Result<StridedArray<T>> {
    flipud_with(src, &TransformConfig::default())
}

pub fn flipud_with<T: Element>(src: &StridedView<T>, config: &TransformConfig) -> Result<StridedArray<T>> {
    if src.ndim() < 1 {
        return Err(StridedError::RankTooSmall {
            op: "flipud",
            rank: src.ndim(),
            min: 1,
        });
    }
    flip_with(src, &[0], config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StridedArray<i32> {
        StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap()
    }

    #[test]
    fn test_flip_both_kernels() {
        let a = sample();
        for kind in [FlipKernelKind::Gather, FlipKernelKind::Recompute] {
            let cfg = TransformConfig::default().with_flip_kernel(kind);
            assert_eq!(flip_with(&a.view(), &[1], &cfg).unwrap().to_vec(), vec![3, 2, 1, 6, 5, 4]);
            assert_eq!(flip_with(&a.view(), &[0, 1], &cfg).unwrap().to_vec(), vec![6, 5, 4, 3, 2, 1]);
            assert_eq!(flip_with(&a.view(), &[-2], &cfg).unwrap().to_vec(), vec![4, 5, 6, 1, 2, 3]);
        }
    }

    #[test]
    fn test_flip_output_is_dense() {
        let a = sample();
        let t = a.view().transpose(0, 1).unwrap();
        let f = flip(&t, &[0]).unwrap();
        assert!(f.is_contiguous());
        assert_eq!(f.dims(), &[3, 2]);
        assert_eq!(f.to_vec(), vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_flip_no_axes_copies() {
        let a = sample();
        assert_eq!(flip(&a.view(), &[]).unwrap(), a);
    }

    #[test]
    fn test_flip_rank0() {
        let a = StridedArray::from_vec(vec![42i64], &[]).unwrap();
        assert_eq!(flip(&a.view(), &[]).unwrap().to_vec(), vec![42]);
        assert!(matches!(
            flip(&a.view(), &[0]),
            Err(StridedError::DimOutOfRange { dim: 0, rank: 0 })
        ));
    }

    #[test]
    fn test_flip_invalid_axes() {
        let a = sample();
        assert!(matches!(
            flip(&a.view(), &[2]),
            Err(StridedError::DimOutOfRange { dim: 2, rank: 2 })
        ));
        assert!(matches!(
            flip(&a.view(), &[1, -1]),
            Err(StridedError::DuplicateDim { dim: 1 })
        ));
    }

    #[test]
    fn test_flip_empty_validates_axes_first() {
        let a = StridedArray::<f32>::row_major(&[0, 3]);
        let f = flip(&a.view(), &[0, 1]).unwrap();
        assert_eq!(f.dims(), &[0, 3]);
        assert!(flip(&a.view(), &[5]).is_err());
    }

    #[test]
    fn test_fliplr_flipud() {
        let a = sample();
        assert_eq!(fliplr(&a.view()).unwrap().to_vec(), vec![3, 2, 1, 6, 5, 4]);
        assert_eq!(flipud(&a.view()).unwrap().to_vec(), vec![4, 5, 6, 1, 2, 3]);

        let v = StridedArray::from_vec(vec![1, 2, 3], &[3]).unwrap();
        assert_eq!(flipud(&v.view()).unwrap().to_vec(), vec![3, 2, 1]);
        assert!(matches!(
            fliplr(&v.view()),
            Err(StridedError::RankTooSmall { op: "fliplr", rank: 1, min: 2 })
        ));

        let s = StridedArray::from_vec(vec![1], &[]).unwrap();
        assert!(matches!(
            flipud(&s.view()),
            Err(StridedError::RankTooSmall { op: "flipud", rank: 0, min: 1 })
        ));
    }

    #[test]
    fn test_kernel_rejects_wrong_output_length() {
        let a = sample();
        let bits = DimBitset::from_dims(&[0], 2).unwrap();
        let mut out = vec![0; 5];
        assert!(matches!(
            GatherFlip::default().flip_into(&a.view(), bits, &mut out),
            Err(StridedError::DataLengthMismatch { expected: 6, found: 5 })
        ));
        assert!(RecomputeFlip::default().flip_into(&a.view(), bits, &mut out).is_err());
    }
}
