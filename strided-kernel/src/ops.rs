//! Copy, pack and concatenate operations on strided views.

use std::mem::size_of;

use crate::iter::{byte_strides, StridedIter};
use crate::maybe_sync::MaybeSendSync;
use crate::threading::SendPtr;
use crate::{Result, StridedArray, StridedError, StridedView, StridedViewMut, DEFAULT_COPY_GRAIN_SIZE};

// ============================================================================
// copy_into
// ============================================================================

/// Copy `src` into `dest` element by element. Shapes must match exactly.
pub fn copy_into<T: Copy + MaybeSendSync>(
    dest: &mut StridedViewMut<T>,
    src: &StridedView<T>,
) -> Result<()> {
    copy_into_with_grain(dest, src, DEFAULT_COPY_GRAIN_SIZE)
}

/// [`copy_into`] with an explicit minimum chunk length.
pub fn copy_into_with_grain<T: Copy + MaybeSendSync>(
    dest: &mut StridedViewMut<T>,
    src: &StridedView<T>,
    grain: usize,
) -> Result<()> {
    if dest.dims() != src.dims() {
        return Err(StridedError::ShapeMismatch(
            dest.dims().to_vec(),
            src.dims().to_vec(),
        ));
    }
    // A zero stride on a real axis would make several writes land on one element.
    for (i, (&d, &s)) in dest.dims().iter().zip(dest.strides()).enumerate() {
        if d > 1 && s == 0 {
            return Err(StridedError::ZeroStride { dim: i });
        }
    }
    let total = dest.len();
    if total == 0 {
        return Ok(());
    }

    let elem = size_of::<T>();
    let dst_ptr = SendPtr(dest.as_mut_ptr() as *mut u8);
    let src_ptr = SendPtr::from_const(src.ptr() as *const u8);

    // Both sides dense row-major: one memcpy.
    if total <= grain && dest.as_view().is_contiguous() && src.is_contiguous() {
        unsafe {
            std::ptr::copy_nonoverlapping(
                src_ptr.as_const() as *const T,
                dst_ptr.as_ptr() as *mut T,
                total,
            );
        }
        return Ok(());
    }

    let iter = StridedIter::new(
        dest.dims(),
        &[
            byte_strides(dest.strides(), elem),
            byte_strides(src.strides(), elem),
        ],
    )?;
    let elem = elem as isize;
    iter.for_each(grain, move |offsets, len, strides| unsafe {
        let d = dst_ptr.as_ptr().offset(offsets[0]);
        let s = src_ptr.as_const().offset(offsets[1]);
        if strides[0] == elem && strides[1] == elem {
            std::ptr::copy_nonoverlapping(s as *const T, d as *mut T, len);
        } else {
            for i in 0..len as isize {
                let v = *(s.offset(i * strides[1]) as *const T);
                *(d.offset(i * strides[0]) as *mut T) = v;
            }
        }
    });
    Ok(())
}

// ============================================================================
// contiguous
// ============================================================================

/// Materialize `src` into a freshly allocated row-major array.
pub fn contiguous<T: Copy + Default + MaybeSendSync>(src: &StridedView<T>) -> Result<StridedArray<T>> {
    contiguous_with_grain(src, DEFAULT_COPY_GRAIN_SIZE)
}

/// [`contiguous`] with an explicit minimum chunk length.
pub fn contiguous_with_grain<T: Copy + Default + MaybeSendSync>(
    src: &StridedView<T>,
    grain: usize,
) -> Result<StridedArray<T>> {
    let mut out = StridedArray::<T>::row_major(src.dims());
    copy_into_with_grain(&mut out.view_mut(), src, grain)?;
    Ok(out)
}

// ============================================================================
// cat
// ============================================================================

/// Concatenate views along `axis`.
///
/// All inputs must share rank and every extent except `axis`. Empty pieces
/// are allowed and contribute nothing.
pub fn cat<T: Copy + Default + MaybeSendSync>(
    pieces: &[StridedView<T>],
    axis: usize,
) -> Result<StridedArray<T>> {
    cat_with_grain(pieces, axis, DEFAULT_COPY_GRAIN_SIZE)
}

/// [`cat`] with an explicit minimum chunk length for each piece's copy.
pub fn cat_with_grain<T: Copy + Default + MaybeSendSync>(
    pieces: &[StridedView<T>],
    axis: usize,
    grain: usize,
) -> Result<StridedArray<T>> {
    let first = pieces.first().ok_or(StridedError::EmptyConcat)?;
    let rank = first.ndim();
    if axis >= rank {
        return Err(StridedError::InvalidAxis { axis, rank });
    }

    let mut out_dims = first.dims().to_vec();
    out_dims[axis] = 0;
    for piece in pieces {
        if piece.ndim() != rank {
            return Err(StridedError::RankMismatch(rank, piece.ndim()));
        }
        let same_outer = piece
            .dims()
            .iter()
            .zip(first.dims())
            .enumerate()
            .all(|(i, (a, b))| i == axis || a == b);
        if !same_outer {
            return Err(StridedError::ShapeMismatch(
                first.dims().to_vec(),
                piece.dims().to_vec(),
            ));
        }
        out_dims[axis] += piece.dims()[axis];
    }

    let mut out = StridedArray::<T>::row_major(&out_dims);
    let mut start = 0;
    for piece in pieces {
        let len = piece.dims()[axis];
        if len == 0 {
            continue;
        }
        let mut dest = out.view_mut().narrow(axis, start, len)?;
        copy_into_with_grain(&mut dest, piece, grain)?;
        start += len;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(dims: &[usize]) -> StridedArray<i32> {
        let n: usize = dims.iter().product();
        StridedArray::from_vec((0..n as i32).collect(), dims).unwrap()
    }

    #[test]
    fn test_copy_into_transposed() {
        let a = arange(&[2, 3]);
        let t = a.view().transpose(0, 1).unwrap();
        for grain in [1, 4, usize::MAX] {
            let out = contiguous_with_grain(&t, grain).unwrap();
            assert_eq!(out.dims(), &[3, 2]);
            assert_eq!(out.data(), &[0, 3, 1, 4, 2, 5]);
        }
    }

    #[test]
    fn test_copy_into_shape_mismatch() {
        let a = arange(&[2, 3]);
        let mut out = StridedArray::<i32>::row_major(&[3, 2]);
        let err = copy_into(&mut out.view_mut(), &a.view()).unwrap_err();
        assert!(matches!(err, StridedError::ShapeMismatch(_, _)));
    }

    #[test]
    fn test_copy_into_rejects_zero_stride_dest() {
        let a = arange(&[2, 3]);
        let mut buf = vec![0i32; 3];
        let mut dest = StridedViewMut::new(&mut buf, &[2, 3], &[0, 1], 0).unwrap();
        assert!(matches!(
            copy_into(&mut dest, &a.view()),
            Err(StridedError::ZeroStride { dim: 0 })
        ));
    }

    #[test]
    fn test_copy_from_broadcast_source() {
        let row = StridedArray::from_vec(vec![7, 8, 9], &[1, 3]).unwrap();
        let b = row.view().broadcast(&[2, 3]).unwrap();
        let out = contiguous_with_grain(&b, 1).unwrap();
        assert_eq!(out.data(), &[7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_contiguous_negative_stride() {
        let data = vec![1.0f64, 2.0, 3.0, 4.0];
        let rev = StridedView::new(&data, &[4], &[-1], 3).unwrap();
        let out = contiguous(&rev).unwrap();
        assert_eq!(out.data(), &[4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_contiguous_rank0() {
        let data = vec![5u8, 6];
        let v = StridedView::new(&data, &[], &[], 1).unwrap();
        let out = contiguous(&v).unwrap();
        assert_eq!(out.data(), &[6]);
    }

    #[test]
    fn test_cat_rotates_columns() {
        let a = arange(&[2, 3]);
        let v = a.view();
        let out = cat(&[v.narrow(1, 2, 1).unwrap(), v.narrow(1, 0, 2).unwrap()], 1).unwrap();
        assert_eq!(out.dims(), &[2, 3]);
        assert_eq!(out.to_vec(), vec![2, 0, 1, 5, 3, 4]);
    }

    #[test]
    fn test_cat_with_empty_piece() {
        let a = arange(&[4]);
        let v = a.view();
        let out = cat_with_grain(&[v.narrow(0, 0, 0).unwrap(), v.clone()], 0, 1).unwrap();
        assert_eq!(out.to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cat_errors() {
        let empty: [StridedView<i32>; 0] = [];
        assert!(matches!(cat(&empty, 0), Err(StridedError::EmptyConcat)));

        let a = arange(&[2, 3]);
        let b = arange(&[3, 3]);
        assert!(matches!(
            cat(&[a.view(), b.view()], 1),
            Err(StridedError::ShapeMismatch(_, _))
        ));
        assert!(cat(&[a.view(), b.view()], 0).is_ok());
        assert!(matches!(
            cat(&[a.view()], 2),
            Err(StridedError::InvalidAxis { axis: 2, rank: 2 })
        ));
    }
}
