//! N-ary strided iteration over a shared logical shape.
//!
//! [`StridedIter`] walks `numel` logical positions of several operands at
//! once. Strides are given in **bytes** so that operands with different
//! element types (for example an output of `f32` and an `i64` lookup table)
//! can share one iteration. Operand 0 is treated as the output when the
//! loop order is chosen.
//!
//! The callback shape mirrors the inner-block kernels: it receives the byte
//! offset of every operand at the start of a run, the run length, and the
//! innermost byte stride of every operand.

use smallvec::SmallVec;

use crate::maybe_sync::MaybeSync;
use crate::plan::{build_plan, IterPlan};
use crate::threading::parallel_for;
use crate::{Result, StridedError};

type SVec<T> = SmallVec<[T; 8]>;

/// Scale element strides to byte strides.
pub fn byte_strides(strides: &[isize], elem_size: usize) -> Vec<isize> {
    strides.iter().map(|&s| s * elem_size as isize).collect()
}

/// Ordered and fused iteration space for several operands.
#[derive(Debug, Clone)]
pub struct StridedIter {
    plan: IterPlan,
    nops: usize,
    numel: usize,
}

impl StridedIter {
    /// Plan iteration over `dims` for operands with the given byte strides.
    ///
    /// Every stride vector must have one entry per dimension.
    pub fn new(dims: &[usize], strides: &[Vec<isize>]) -> Result<Self> {
        for s in strides {
            if s.len() != dims.len() {
                return Err(StridedError::StrideLengthMismatch);
            }
        }
        let numel: usize = dims.iter().product();
        let refs: Vec<&[isize]> = strides.iter().map(|s| s.as_slice()).collect();
        let plan = if numel == 0 {
            IterPlan {
                dims: Vec::new(),
                strides: vec![SmallVec::new(); strides.len()],
            }
        } else {
            build_plan(dims, &refs)
        };
        Ok(Self {
            plan,
            nops: strides.len(),
            numel,
        })
    }

    /// Number of logical positions visited.
    #[inline]
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// Dimensions after ordering and fusion, innermost first.
    pub fn fused_dims(&self) -> &[usize] {
        &self.plan.dims
    }

    /// Visit positions `[begin, end)` of the planned order on this thread.
    ///
    /// Calls `f(offsets, len, inner_strides)` once per run along the
    /// innermost planned axis, clipped to the range.
    pub fn serial_for_each<F>(&self, begin: usize, end: usize, mut f: F)
    where
        F: FnMut(&[isize], usize, &[isize]),
    {
        let end = end.min(self.numel);
        if begin >= end {
            return;
        }
        let dims = &self.plan.dims;
        let strides = &self.plan.strides;
        let rank = dims.len();

        if rank == 0 {
            // one element, every operand at its base
            let zeros: SVec<isize> = SmallVec::from_elem(0, self.nops);
            f(&zeros, 1, &zeros);
            return;
        }

        let inner: SVec<isize> = strides.iter().map(|s| s[0]).collect();

        // decompose begin into a coordinate, innermost first
        let mut idx: SVec<usize> = SmallVec::from_elem(0, rank);
        let mut rem = begin;
        for d in 0..rank {
            idx[d] = rem % dims[d];
            rem /= dims[d];
        }
        let mut offsets: SVec<isize> = strides
            .iter()
            .map(|s| (0..rank).map(|d| idx[d] as isize * s[d]).sum::<isize>())
            .collect();

        let mut pos = begin;
        while pos < end {
            let run = (dims[0] - idx[0]).min(end - pos);
            f(&offsets, run, &inner);
            pos += run;
            if pos >= end {
                break;
            }

            for (o, s) in offsets.iter_mut().zip(strides) {
                *o += run as isize * s[0];
            }
            idx[0] += run;
            if idx[0] < dims[0] {
                continue;
            }
            // carry into outer axes
            for (o, s) in offsets.iter_mut().zip(strides) {
                *o -= dims[0] as isize * s[0];
            }
            idx[0] = 0;
            for d in 1..rank {
                idx[d] += 1;
                for (o, s) in offsets.iter_mut().zip(strides) {
                    *o += s[d];
                }
                if idx[d] < dims[d] {
                    break;
                }
                for (o, s) in offsets.iter_mut().zip(strides) {
                    *o -= dims[d] as isize * s[d];
                }
                idx[d] = 0;
            }
        }
    }

    /// Visit every position, splitting the range into chunks of at least
    /// `grain` positions that may run on different threads.
    pub fn for_each<F>(&self, grain: usize, f: F)
    where
        F: Fn(&[isize], usize, &[isize]) + MaybeSync,
    {
        parallel_for(0, self.numel, grain, |begin, end| {
            self.serial_for_each(begin, end, |offsets, len, strides| f(offsets, len, strides));
        });
    }
}
