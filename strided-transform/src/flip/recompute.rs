use strided_kernel::{parallel_for, SendPtr};

use super::{check_output, FlipKernel};
use crate::config::DEFAULT_RECOMPUTE_GRAIN_SIZE;
use crate::dim_bitset::DimBitset;
use crate::strides::contiguous_strides;
use crate::{Element, Result, StridedView};

/// Flip by decomposing each linear output index into coordinates.
///
/// For output index `i` the coordinate on axis `d` is read off the dense
/// strides of the shape; flipped axes use `extent - 1 - coord`, and the
/// source offset is rebuilt from the view's real strides. Works on any
/// layout, including negative and zero strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeFlip {
    grain_size: usize,
}

impl RecomputeFlip {
    pub fn new(grain_size: usize) -> Self {
        Self {
            grain_size: grain_size.max(1),
        }
    }

    pub fn grain_size(&self) -> usize {
        self.grain_size
    }
}

impl Default for RecomputeFlip {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMPUTE_GRAIN_SIZE)
    }
}

impl FlipKernel for RecomputeFlip {
    fn flip_into<T: Element>(&self, src: &StridedView<T>, dims: DimBitset, out: &mut [T]) -> Result<()> {
        check_output(src, out)?;
        let numel = out.len();
        if numel == 0 {
            return Ok(());
        }

        let shape = src.dims();
        let strides = src.strides();
        let cstrides = contiguous_strides(shape);
        let data = src.data();
        let base = src.offset();
        let out_ptr = SendPtr(out.as_mut_ptr());

        parallel_for(0, numel, self.grain_size, |begin, end| {
            for i in begin..end {
                let mut rem = i as isize;
                let mut offset = base;
                for d in 0..shape.len() {
                    let coord = rem / cstrides[d];
                    rem %= cstrides[d];
                    let coord = if dims.contains(d) {
                        shape[d] as isize - 1 - coord
                    } else {
                        coord
                    };
                    offset += coord * strides[d];
                }
                let value = data[offset as usize];
                // SAFETY: i < numel == out.len(), and chunks are disjoint.
                unsafe { *out_ptr.as_ptr().add(i) = value };
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StridedArray;

    #[test]
    fn test_recompute_negative_stride_source() {
        // [4, 3, 2, 1] seen through a reversed view flips back to [1, 2, 3, 4]
        let data = vec![1, 2, 3, 4];
        let rev = StridedView::new(&data, &[4], &[-1], 3).unwrap();
        let mut out = vec![0; 4];
        let bits = DimBitset::from_dims(&[0], 1).unwrap();
        RecomputeFlip::new(1).flip_into(&rev, bits, &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_recompute_middle_axis() {
        let a = StridedArray::<u16>::from_fn_row_major(&[2, 3, 2], |idx| {
            (idx[0] * 100 + idx[1] * 10 + idx[2]) as u16
        });
        let mut out = vec![0u16; 12];
        let bits = DimBitset::from_dims(&[1], 3).unwrap();
        for grain in [1, 5, usize::MAX] {
            RecomputeFlip::new(grain).flip_into(&a.view(), bits, &mut out).unwrap();
            assert_eq!(
                out,
                vec![20, 21, 10, 11, 0, 1, 120, 121, 110, 111, 100, 101]
            );
        }
    }
}
