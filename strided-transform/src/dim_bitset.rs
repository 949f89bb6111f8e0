//! Axis-set selection for multi-axis operations.

use crate::{Result, StridedError};

/// Maximum rank a [`DimBitset`] can describe.
pub const DIM_BITSET_SIZE: usize = 64;

/// Normalize a possibly negative axis into `[0, rank)`.
///
/// Negative axes count from the back: `-1` is the last axis. A rank-0 array
/// has no valid axis.
pub fn wrap_dim(dim: isize, rank: usize) -> Result<usize> {
    let r = rank as isize;
    let wrapped = if dim < 0 { dim + r } else { dim };
    if wrapped < 0 || wrapped >= r {
        return Err(StridedError::DimOutOfRange { dim, rank });
    }
    Ok(wrapped as usize)
}

/// One membership bit per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DimBitset(u64);

impl DimBitset {
    /// Build from an axis list, rejecting out-of-range and repeated axes.
    pub fn from_dims(dims: &[isize], rank: usize) -> Result<Self> {
        if rank > DIM_BITSET_SIZE {
            return Err(StridedError::RankTooLarge {
                rank,
                max: DIM_BITSET_SIZE,
            });
        }
        let mut bits = 0u64;
        for &dim in dims {
            let d = wrap_dim(dim, rank)?;
            if bits & (1 << d) != 0 {
                return Err(StridedError::DuplicateDim { dim: d });
            }
            bits |= 1 << d;
        }
        Ok(Self(bits))
    }

    #[inline]
    pub fn contains(&self, dim: usize) -> bool {
        dim < DIM_BITSET_SIZE && self.0 & (1 << dim) != 0
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Member axes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let bits = self.0;
        (0..DIM_BITSET_SIZE).filter(move |&d| bits & (1 << d) != 0)
    }
}
