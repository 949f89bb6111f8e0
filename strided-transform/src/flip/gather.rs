use std::mem::size_of;

use strided_kernel::{byte_strides, SendPtr, StridedIter};

use super::{check_output, FlipKernel};
use crate::config::DEFAULT_GATHER_GRAIN_SIZE;
use crate::dim_bitset::DimBitset;
use crate::{row_major_strides, Element, Result, StridedArray, StridedView};

const OFFSET_SIZE: isize = size_of::<i64>() as isize;

/// Flip by gathering through precomputed per-axis offset tables.
///
/// The source is restrided with stride 0 on every flipped axis, so a plain
/// walk in output order stays on the first element along those axes. Each
/// flipped axis then contributes, from its lookup table, the byte distance
/// to the mirrored element. All operands are driven by one
/// [`StridedIter`], which picks the loop order and splits the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherFlip {
    grain_size: usize,
}

impl GatherFlip {
    pub fn new(grain_size: usize) -> Self {
        Self {
            grain_size: grain_size.max(1),
        }
    }

    pub fn grain_size(&self) -> usize {
        self.grain_size
    }
}

impl Default for GatherFlip {
    fn default() -> Self {
        Self::new(DEFAULT_GATHER_GRAIN_SIZE)
    }
}

/// Build one offset table per flipped axis, in ascending axis order.
///
/// The table for axis `d` has extent `shape[d]` on `d` and 1 everywhere
/// else, so it broadcasts against the full shape. Entry `i` holds
/// `(shape[d] - 1 - i) * strides[d] * elem_size`, in bytes.
pub fn build_indices(
    shape: &[usize],
    strides: &[isize],
    elem_size: usize,
    dims: DimBitset,
) -> Vec<StridedArray<i64>> {
    dims.iter()
        .map(|d| {
            let n = shape[d];
            let step = (strides[d] * elem_size as isize) as i64;
            let mut table_shape = vec![1usize; shape.len()];
            table_shape[d] = n;
            StridedArray::from_fn_row_major(&table_shape, |idx| (n - 1 - idx[d]) as i64 * step)
        })
        .collect()
}

/// Sums the per-axis offset tables at one position of a run.
struct Indexer<'a> {
    tables: &'a [&'a [i64]],
    offsets: &'a [isize],
    strides: &'a [isize],
}

impl<'a> Indexer<'a> {
    fn new(tables: &'a [&'a [i64]], offsets: &'a [isize], strides: &'a [isize]) -> Self {
        debug_assert_eq!(tables.len(), offsets.len());
        debug_assert_eq!(tables.len(), strides.len());
        Self {
            tables,
            offsets,
            strides,
        }
    }

    /// Total byte offset at position `j` of the current run.
    #[inline]
    fn get(&self, j: usize) -> isize {
        let mut total = 0isize;
        for ((table, &off), &stride) in self.tables.iter().zip(self.offsets).zip(self.strides) {
            let byte = off + stride * j as isize;
            debug_assert_eq!(byte % OFFSET_SIZE, 0);
            total += table[(byte / OFFSET_SIZE) as usize] as isize;
        }
        total
    }
}

impl FlipKernel for GatherFlip {
    fn flip_into<T: Element>(&self, src: &StridedView<T>, dims: DimBitset, out: &mut [T]) -> Result<()> {
        check_output(src, out)?;
        if out.is_empty() {
            return Ok(());
        }

        let shape = src.dims();
        let elem = size_of::<T>();

        let restrided_strides: Vec<isize> = src
            .strides()
            .iter()
            .enumerate()
            .map(|(d, &s)| if dims.contains(d) { 0 } else { s })
            .collect();
        let restrided = src.as_strided(shape, &restrided_strides)?;

        let indices = build_indices(shape, src.strides(), elem, dims);
        let mut operands = Vec::with_capacity(2 + indices.len());
        operands.push(byte_strides(&row_major_strides(shape), elem));
        operands.push(byte_strides(restrided.strides(), elem));
        for table in &indices {
            let broadcast = table.view().broadcast(shape)?;
            operands.push(byte_strides(broadcast.strides(), size_of::<i64>()));
        }
        let iter = StridedIter::new(shape, &operands)?;

        let tables: Vec<&[i64]> = indices.iter().map(|t| t.data()).collect();
        let data = restrided.data();
        let base = restrided.offset();
        let elem = elem as isize;
        let out_len = out.len();
        let out_ptr = SendPtr(out.as_mut_ptr());

        iter.for_each(self.grain_size, |offsets, len, strides| {
            let indexer = Indexer::new(&tables, &offsets[2..], &strides[2..]);
            for j in 0..len {
                let src_byte = offsets[1] + strides[1] * j as isize + indexer.get(j);
                debug_assert_eq!(src_byte % elem, 0);
                let value = data[(base + src_byte / elem) as usize];

                let dst = ((offsets[0] + strides[0] * j as isize) / elem) as usize;
                debug_assert!(dst < out_len);
                // SAFETY: the output operand is dense and runs never overlap.
                unsafe { *out_ptr.as_ptr().add(dst) = value };
            }
        });
        Ok(())
    }
}
