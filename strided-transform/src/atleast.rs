//! Rank promotion by inserting size-1 axes.
//!
//! Every function here only rewrites metadata; data is never copied.
//!
//! | input rank | `atleast_1d` | `atleast_2d` | `atleast_3d`   |
//! |------------|--------------|--------------|----------------|
//! | 0          | `[1]`        | `[1, 1]`     | `[1, 1, 1]`    |
//! | 1 (`[n]`)  | unchanged    | `[1, n]`     | `[1, n, 1]`    |
//! | 2 (`[m, n]`) | unchanged  | unchanged    | `[m, n, 1]`    |

use crate::{Result, StridedArray, StridedView};

pub fn atleast_1d<'a, T>(src: &StridedView<'a, T>) -> Result<StridedView<'a, T>> {
    match src.ndim() {
        0 => src.reshape(&[1]),
        _ => Ok(src.clone()),
    }
}

pub fn atleast_2d<'a, T>(src: &StridedView<'a, T>) -> Result<StridedView<'a, T>> {
    match src.ndim() {
        0 => src.reshape(&[1, 1]),
        1 => src.unsqueeze(0),
        _ => Ok(src.clone()),
    }
}

pub fn atleast_3d<'a, T>(src: &StridedView<'a, T>) -> Result<StridedView<'a, T>> {
    match src.ndim() {
        0 => src.reshape(&[1, 1, 1]),
        1 => src.unsqueeze(0)?.unsqueeze(2),
        2 => src.unsqueeze(2),
        _ => Ok(src.clone()),
    }
}

/// [`atleast_1d`] applied to every view, preserving order.
pub fn atleast_1d_all<'a, T>(srcs: &[StridedView<'a, T>]) -> Result<Vec<StridedView<'a, T>>> {
    srcs.iter().map(|v| atleast_1d(v)).collect()
}

/// [`atleast_2d`] applied to every view, preserving order.
pub fn atleast_2d_all<'a, T>(srcs: &[StridedView<'a, T>]) -> Result<Vec<StridedView<'a, T>>> {
    srcs.iter().map(|v| atleast_2d(v)).collect()
}

/// [`atleast_3d`] applied to every view, preserving order.
pub fn atleast_3d_all<'a, T>(srcs: &[StridedView<'a, T>]) -> Result<Vec<StridedView<'a, T>>> {
    srcs.iter().map(|v| atleast_3d(v)).collect()
}

/// Promote an owned array to at least `min_rank` (1, 2 or 3), keeping its buffer.
pub(crate) fn promote_owned<T>(array: StridedArray<T>, min_rank: usize) -> Result<StridedArray<T>> {
    let (dims, strides, offset) = {
        let view = array.view();
        let promoted = match min_rank {
            0 | 1 => atleast_1d(&view)?,
            2 => atleast_2d(&view)?,
            _ => atleast_3d(&view)?,
        };
        (
            promoted.dims().to_vec(),
            promoted.strides().to_vec(),
            promoted.offset(),
        )
    };
    StridedArray::from_parts(array.into_data(), &dims, &strides, offset)
}
