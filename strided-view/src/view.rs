//! Dynamic-rank strided view types.
//!
//! - [`StridedView`]: Immutable dynamic-rank strided view
//! - [`StridedViewMut`]: Mutable dynamic-rank strided view
//! - [`StridedArray`]: Owned strided multidimensional array
//!
//! Two views may alias the same buffer. A stride of 0 along an axis makes
//! every coordinate on that axis address the same element.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::{Result, StridedError};

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that all accessed offsets stay within `[0, len)`.
fn validate_bounds(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    // Empty array - no access needed
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(StridedError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(StridedError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 {
        return Err(StridedError::OffsetOverflow);
    }
    if max_offset as usize >= len {
        return Err(StridedError::OffsetOverflow);
    }
    Ok(())
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Whether `(dims, strides)` address a dense row-major block.
///
/// Axes with `dim <= 1` are ignored since they never vary.
fn is_row_major_dense(dims: &[usize], strides: &[isize]) -> bool {
    let mut expected = 1isize;
    for (&dim, &stride) in dims.iter().rev().zip(strides.iter().rev()) {
        if dim <= 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(dim as isize);
    }
    true
}

fn check_axis(axis: usize, rank: usize) -> Result<()> {
    if axis >= rank {
        return Err(StridedError::InvalidAxis { axis, rank });
    }
    Ok(())
}

/// Offset of element `indices` relative to the view base.
#[inline]
fn linear_offset(indices: &[usize], dims: &[usize], strides: &[isize]) -> isize {
    assert_eq!(indices.len(), dims.len(), "wrong number of indices");
    let mut idx = 0isize;
    for (i, &index) in indices.iter().enumerate() {
        assert!(
            index < dims[i],
            "index {} out of bounds for dim {}",
            index,
            dims[i]
        );
        idx += index as isize * strides[i];
    }
    idx
}

/// Collect the logical elements of `(dims, strides, offset)` in row-major order.
fn gather_row_major<T: Copy>(data: &[T], dims: &[usize], strides: &[isize], offset: isize) -> Vec<T> {
    let total: usize = dims.iter().product();
    let rank = dims.len();
    let mut out = Vec::with_capacity(total);
    if total == 0 {
        return out;
    }
    let mut idx = vec![0usize; rank];
    let mut pos = offset;
    for _ in 0..total {
        out.push(data[pos as usize]);
        for d in (0..rank).rev() {
            idx[d] += 1;
            pos += strides[d];
            if idx[d] < dims[d] {
                break;
            }
            pos -= dims[d] as isize * strides[d];
            idx[d] = 0;
        }
    }
    out
}

// ============================================================================
// StridedView
// ============================================================================

/// Dynamic-rank immutable strided view.
///
/// Dims and strides are reference-counted so that metadata transformations
/// (narrow, transpose, as_strided, ...) are cheap and never touch the data.
pub struct StridedView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a new immutable strided view from a borrowed slice.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Create a view without bounds checking.
    ///
    /// # Safety
    /// The caller must ensure all index combinations stay within bounds.
    pub unsafe fn new_unchecked(
        data: &'a [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Self {
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements (1 for rank 0).
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Raw const pointer to the element at the view's base offset.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_offset(self.offset)
    }

    /// Whether the view addresses a dense row-major block.
    pub fn is_contiguous(&self) -> bool {
        is_row_major_dense(&self.dims, &self.strides)
    }

    /// Reinterpret the same data with new dims and strides, keeping the offset.
    ///
    /// Zero strides are allowed: every coordinate along such an axis maps to
    /// the same element.
    pub fn as_strided(&self, dims: &[usize], strides: &[isize]) -> Result<StridedView<'a, T>> {
        StridedView::new(self.data, dims, strides, self.offset)
    }

    /// Restrict `axis` to `[start, start + len)`.
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<StridedView<'a, T>> {
        let (dims, offset) = narrowed(&self.dims, &self.strides, self.offset, axis, start, len)?;
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: self.strides.clone(),
            offset,
        })
    }

    /// Permute dimensions.
    pub fn permute(&self, perm: &[usize]) -> Result<StridedView<'a, T>> {
        let (dims, strides) = permuted(&self.dims, &self.strides, perm)?;
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: self.offset,
        })
    }

    /// Swap two axes.
    pub fn transpose(&self, a: usize, b: usize) -> Result<StridedView<'a, T>> {
        let rank = self.ndim();
        check_axis(a, rank)?;
        check_axis(b, rank)?;
        let mut dims = self.dims.to_vec();
        let mut strides = self.strides.to_vec();
        dims.swap(a, b);
        strides.swap(a, b);
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: self.offset,
        })
    }

    /// Insert a size-1 axis at `pos` (`0..=ndim`).
    pub fn unsqueeze(&self, pos: usize) -> Result<StridedView<'a, T>> {
        let (dims, strides) = unsqueezed(&self.dims, &self.strides, pos)?;
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: self.offset,
        })
    }

    /// Reinterpret with new dims without moving data.
    ///
    /// Only views with at most one element or dense row-major layout can be
    /// reshaped; anything else needs a copy first.
    pub fn reshape(&self, dims: &[usize]) -> Result<StridedView<'a, T>> {
        let total: usize = dims.iter().product();
        if total != self.len() {
            return Err(StridedError::ShapeMismatch(self.dims.to_vec(), dims.to_vec()));
        }
        if self.len() > 1 && !self.is_contiguous() {
            return Err(StridedError::NonContiguousReshape(self.dims.to_vec()));
        }
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: self.offset,
        })
    }

    /// Broadcast this view to a target shape.
    ///
    /// Size-1 dimensions are expanded (stride set to 0) to match target.
    pub fn broadcast(&self, target_dims: &[usize]) -> Result<StridedView<'a, T>> {
        if self.dims.len() != target_dims.len() {
            return Err(StridedError::RankMismatch(
                self.dims.len(),
                target_dims.len(),
            ));
        }
        let mut new_strides = Vec::with_capacity(self.dims.len());
        for i in 0..self.dims.len() {
            if self.dims[i] == target_dims[i] {
                new_strides.push(self.strides[i]);
            } else if self.dims[i] == 1 {
                new_strides.push(0);
            } else {
                return Err(StridedError::ShapeMismatch(
                    self.dims.to_vec(),
                    target_dims.to_vec(),
                ));
            }
        }
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(target_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }
}

impl<'a, T: Copy> StridedView<'a, T> {
    /// Get an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        self.data[(self.offset + idx) as usize]
    }

    /// Elements in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        gather_row_major(self.data, &self.dims, &self.strides, self.offset)
    }
}

// ============================================================================
// Shared metadata transformations
// ============================================================================

fn narrowed(
    dims: &[usize],
    strides: &[isize],
    offset: isize,
    axis: usize,
    start: usize,
    len: usize,
) -> Result<(Vec<usize>, isize)> {
    check_axis(axis, dims.len())?;
    let size = dims[axis];
    if start > size || len > size - start {
        return Err(StridedError::NarrowOutOfRange {
            axis,
            start,
            len,
            size,
        });
    }
    let mut new_dims = dims.to_vec();
    new_dims[axis] = len;
    Ok((new_dims, offset + start as isize * strides[axis]))
}

fn permuted(dims: &[usize], strides: &[isize], perm: &[usize]) -> Result<(Vec<usize>, Vec<isize>)> {
    let rank = dims.len();
    if perm.len() != rank {
        return Err(StridedError::RankMismatch(perm.len(), rank));
    }
    let mut seen = vec![false; rank];
    for &p in perm {
        check_axis(p, rank)?;
        if seen[p] {
            return Err(StridedError::InvalidAxis { axis: p, rank });
        }
        seen[p] = true;
    }
    Ok((
        perm.iter().map(|&p| dims[p]).collect(),
        perm.iter().map(|&p| strides[p]).collect(),
    ))
}

fn unsqueezed(dims: &[usize], strides: &[isize], pos: usize) -> Result<(Vec<usize>, Vec<isize>)> {
    let rank = dims.len();
    if pos > rank {
        return Err(StridedError::InvalidAxis {
            axis: pos,
            rank: rank + 1,
        });
    }
    let stride = if pos < rank {
        dims[pos] as isize * strides[pos]
    } else {
        1
    };
    let mut new_dims = dims.to_vec();
    let mut new_strides = strides.to_vec();
    new_dims.insert(pos, 1);
    new_strides.insert(pos, stride);
    Ok((new_dims, new_strides))
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Dynamic-rank mutable strided view.
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> std::fmt::Debug for StridedViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedViewMut<'a, T> {
    /// Create a new mutable strided view.
    pub fn new(
        data: &'a mut [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Raw mutable pointer to the element at the view's base offset.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_offset(self.offset)
    }

    /// Restrict `axis` to `[start, start + len)`, consuming the mutable view.
    ///
    /// Takes `self` by value to prevent aliasing of mutable views.
    pub fn narrow(self, axis: usize, start: usize, len: usize) -> Result<StridedViewMut<'a, T>> {
        let (dims, offset) = narrowed(&self.dims, &self.strides, self.offset, axis, start, len)?;
        Ok(StridedViewMut {
            data: self.data,
            dims: Arc::from(dims),
            strides: self.strides,
            offset,
        })
    }

    /// Permute dimensions, consuming the mutable view.
    pub fn permute(self, perm: &[usize]) -> Result<StridedViewMut<'a, T>> {
        let (dims, strides) = permuted(&self.dims, &self.strides, perm)?;
        Ok(StridedViewMut {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset: self.offset,
        })
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<'a, T: Copy> StridedViewMut<'a, T> {
    /// Get an element.
    pub fn get(&self, indices: &[usize]) -> T {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        self.data[(self.offset + idx) as usize]
    }

    /// Set an element.
    pub fn set(&mut self, indices: &[usize], value: T) {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        self.data[(self.offset + idx) as usize] = value;
    }
}

// ============================================================================
// StridedArray
// ============================================================================

/// Owned strided multidimensional array.
///
/// Freshly allocated arrays are dense; metadata operations such as
/// [`StridedArray::transpose_in_place`] may leave them with a permuted layout.
pub struct StridedArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> std::fmt::Debug for StridedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T: Clone> Clone for StridedArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

/// Logical equality: same dims and same elements in row-major order,
/// regardless of memory layout.
impl<T: Copy + PartialEq> PartialEq for StridedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.to_vec() == other.to_vec()
    }
}

impl<T: Clone + Default> StridedArray<T> {
    /// Create a column-major array filled with Default values.
    pub fn col_major(dims: &[usize]) -> Self {
        let total: usize = dims.iter().product();
        Self {
            data: vec![T::default(); total],
            dims: Arc::from(dims),
            strides: Arc::from(col_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a row-major array filled with Default values.
    pub fn row_major(dims: &[usize]) -> Self {
        let total: usize = dims.iter().product();
        Self {
            data: vec![T::default(); total],
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a column-major array with values produced by a function.
    ///
    /// The function is called with indices in column-major iteration order.
    pub fn from_fn_col_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in 0..rank {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(col_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a row-major array with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn_row_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in (0..rank).rev() {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }
}

impl<T> StridedArray<T> {
    /// Create from raw parts.
    pub fn from_parts(
        data: Vec<T>,
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Wrap a row-major buffer.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        let expected: usize = dims.iter().product();
        if data.len() != expected {
            return Err(StridedError::DataLengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the array, returning its backing buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn is_contiguous(&self) -> bool {
        is_row_major_dense(&self.dims, &self.strides)
    }

    /// Create an immutable view over this array.
    pub fn view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }

    /// Create a mutable view over this array.
    pub fn view_mut(&mut self) -> StridedViewMut<'_, T> {
        StridedViewMut {
            data: &mut self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }

    /// Swap two axes by rewriting metadata only.
    pub fn transpose_in_place(&mut self, a: usize, b: usize) -> Result<()> {
        let rank = self.ndim();
        check_axis(a, rank)?;
        check_axis(b, rank)?;
        let mut dims = self.dims.to_vec();
        let mut strides = self.strides.to_vec();
        dims.swap(a, b);
        strides.swap(a, b);
        self.dims = Arc::from(dims);
        self.strides = Arc::from(strides);
        Ok(())
    }

    /// Reinterpret a dense array with new dims.
    pub fn into_reshaped(self, dims: &[usize]) -> Result<Self> {
        let total: usize = dims.iter().product();
        if total != self.len() {
            return Err(StridedError::ShapeMismatch(self.dims.to_vec(), dims.to_vec()));
        }
        if self.len() > 1 && !self.is_contiguous() {
            return Err(StridedError::NonContiguousReshape(self.dims.to_vec()));
        }
        Ok(Self {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: self.offset,
        })
    }

    /// Iterate over all elements in memory order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Copy> StridedArray<T> {
    /// Get an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.view().get(indices)
    }

    /// Set an element by multi-dimensional index.
    pub fn set(&mut self, indices: &[usize], value: T) {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        self.data[(self.offset + idx) as usize] = value;
    }

    /// Elements in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        gather_row_major(&self.data, &self.dims, &self.strides, self.offset)
    }
}

impl<T: Copy> Index<&[usize]> for StridedArray<T> {
    type Output = T;

    fn index(&self, indices: &[usize]) -> &T {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        &self.data[(self.offset + idx) as usize]
    }
}

impl<T: Copy> IndexMut<&[usize]> for StridedArray<T> {
    fn index_mut(&mut self, indices: &[usize]) -> &mut T {
        let idx = linear_offset(indices, &self.dims, &self.strides);
        &mut self.data[(self.offset + idx) as usize]
    }
}

// ============================================================================
// Tests
// ============================================================================
