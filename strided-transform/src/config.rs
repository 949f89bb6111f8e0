//! Run-time tuning knobs.
//!
//! Grain sizes are the minimum number of elements handed to one parallel
//! chunk. They only affect speed: every kernel produces the same output for
//! any grain from 1 up to the full element count.

pub use strided_kernel::DEFAULT_COPY_GRAIN_SIZE;

/// Default chunk length for the gather flip kernel.
pub const DEFAULT_GATHER_GRAIN_SIZE: usize = 3000;

/// Default chunk length for the recompute flip kernel.
pub const DEFAULT_RECOMPUTE_GRAIN_SIZE: usize = 1000;

/// Which flip strategy [`crate::flip_with`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlipKernelKind {
    /// Precomputed per-axis offset tables driven through the strided iterator.
    #[default]
    Gather,
    /// Per-element coordinate decomposition.
    Recompute,
}

/// Tuning for the `*_with` entry points.
///
/// ```rust
/// use strided_transform::{FlipKernelKind, TransformConfig};
///
/// let cfg = TransformConfig::default()
///     .with_flip_kernel(FlipKernelKind::Recompute)
///     .with_recompute_grain_size(0);
/// assert_eq!(cfg.recompute_grain_size, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub flip_kernel: FlipKernelKind,
    pub gather_grain_size: usize,
    pub recompute_grain_size: usize,
    /// Used by roll, rot90 (k = 0) and plain copies.
    pub copy_grain_size: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            flip_kernel: FlipKernelKind::Gather,
            gather_grain_size: DEFAULT_GATHER_GRAIN_SIZE,
            recompute_grain_size: DEFAULT_RECOMPUTE_GRAIN_SIZE,
            copy_grain_size: DEFAULT_COPY_GRAIN_SIZE,
        }
    }
}

impl TransformConfig {
    pub fn with_flip_kernel(mut self, kind: FlipKernelKind) -> Self {
        self.flip_kernel = kind;
        self
    }

    pub fn with_gather_grain_size(mut self, grain: usize) -> Self {
        self.gather_grain_size = grain.max(1);
        self
    }

    pub fn with_recompute_grain_size(mut self, grain: usize) -> Self {
        self.recompute_grain_size = grain.max(1);
        self
    }

    pub fn with_copy_grain_size(mut self, grain: usize) -> Self {
        self.copy_grain_size = grain.max(1);
        self
    }

    /// Every grain set to `grain`. `usize::MAX` forces sequential execution.
    pub fn with_grain_size(self, grain: usize) -> Self {
        self.with_gather_grain_size(grain)
            .with_recompute_grain_size(grain)
            .with_copy_grain_size(grain)
    }
}
