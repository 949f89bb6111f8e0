//! Dense row-major strides used to decompose linear indices.

/// Strides a buffer of `shape` would have if laid out row-major.
///
/// Extents of 0 count as 1 so the vector stays usable for coordinate
/// decomposition on empty shapes. This is derived from the shape alone and
/// is unrelated to the strides of any particular view.
pub fn contiguous_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![1isize; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = shape[d + 1].max(1) as isize * strides[d + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_strides() {
        assert_eq!(contiguous_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(contiguous_strides(&[5]), vec![1]);
        assert!(contiguous_strides(&[]).is_empty());
    }

    #[test]
    fn test_contiguous_strides_zero_extent() {
        assert_eq!(contiguous_strides(&[2, 0, 3]), vec![3, 3, 1]);
    }
}
