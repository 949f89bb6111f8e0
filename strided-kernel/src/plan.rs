//! Loop ordering and dimension fusion for N-ary strided iteration.
//!
//! The planner turns a logical shape plus one stride vector per operand into
//! an iteration space where position 0 is the innermost loop:
//!
//! 1. Rank each operand's strides (`index_order`)
//! 2. Score every axis by bit-packing those ranks, output weighted 2x
//! 3. Sort axes by score, descending (smallest output stride innermost)
//! 4. Fuse neighbours that are contiguous for every operand
//! 5. Drop the size-1 axes left behind

use smallvec::SmallVec;

/// Per-operand stride vector in iteration order.
pub(crate) type StrideVec = SmallVec<[isize; 8]>;

/// An ordered, fused iteration space. `dims[0]` is the innermost loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IterPlan {
    pub(crate) dims: Vec<usize>,
    pub(crate) strides: Vec<StrideVec>,
}

/// Rank of each stride by magnitude, 1-based. Zero strides rank 1.
pub(crate) fn index_order(strides: &[isize]) -> Vec<usize> {
    strides
        .iter()
        .map(|&s| {
            if s == 0 {
                return 1;
            }
            let si = s.unsigned_abs();
            1 + strides
                .iter()
                .filter(|&&t| t != 0 && t.unsigned_abs() < si)
                .count()
        })
        .collect()
}

/// Importance score per axis. Operand 0 is the output and counts double;
/// axes of size <= 1 score zero so they sort to the outside.
fn compute_importance(dims: &[usize], strides_list: &[&[isize]]) -> Vec<u64> {
    let n = dims.len();
    let m = strides_list.len();
    if n == 0 || m == 0 {
        return vec![0; n];
    }
    // bits needed to hold the operand count without carry between ranks
    let g = (64 - (m as u64 + 1).leading_zeros()) as u64;

    let mut importance = vec![0u64; n];
    for (k, strides) in strides_list.iter().enumerate() {
        let weight = if k == 0 { 2 } else { 1 };
        for (i, rank) in index_order(strides).into_iter().enumerate() {
            let shift = g * (n - rank) as u64;
            importance[i] = importance[i].saturating_add(weight * (1u64 << shift.min(62)));
        }
    }
    for (imp, &d) in importance.iter_mut().zip(dims) {
        if d <= 1 {
            *imp = 0;
        }
    }
    importance
}

/// Axis permutation, innermost first. The sort is stable so ties keep
/// their original relative order.
pub(crate) fn compute_order(dims: &[usize], strides_list: &[&[isize]]) -> Vec<usize> {
    let importance = compute_importance(dims, strides_list);
    let mut order: Vec<usize> = (0..dims.len()).collect();
    order.sort_by(|&a, &b| importance[b].cmp(&importance[a]));
    order
}

/// Merge axis `i` into `i - 1` whenever `strides[i] == dims[i-1] * strides[i-1]`
/// holds for every operand. Merged axes are left with size 1.
pub(crate) fn fuse_dims(dims: &[usize], strides_list: &[StrideVec]) -> Vec<usize> {
    let mut fused = dims.to_vec();
    for i in (1..fused.len()).rev() {
        let contiguous = strides_list
            .iter()
            .all(|s| s[i] == fused[i - 1] as isize * s[i - 1]);
        if contiguous {
            fused[i - 1] *= fused[i];
            fused[i] = 1;
        }
    }
    fused
}

/// Remove size-1 axes. Only valid for non-empty iteration spaces.
fn compress_dims(dims: &[usize], strides_list: &[StrideVec]) -> IterPlan {
    let keep: Vec<usize> = (0..dims.len()).filter(|&i| dims[i] != 1).collect();
    IterPlan {
        dims: keep.iter().map(|&i| dims[i]).collect(),
        strides: strides_list
            .iter()
            .map(|s| keep.iter().map(|&i| s[i]).collect())
            .collect(),
    }
}

/// Build the iteration plan for `dims` shared by all operands.
pub(crate) fn build_plan(dims: &[usize], strides_list: &[&[isize]]) -> IterPlan {
    let order = compute_order(dims, strides_list);
    let ordered_dims: Vec<usize> = order.iter().map(|&d| dims[d]).collect();
    let ordered_strides: Vec<StrideVec> = strides_list
        .iter()
        .map(|s| order.iter().map(|&d| s[d]).collect())
        .collect();

    let fused = fuse_dims(&ordered_dims, &ordered_strides);
    let plan = compress_dims(&fused, &ordered_strides);
    log::trace!(
        "plan: dims {:?} order {:?} -> fused {:?}",
        dims,
        order,
        plan.dims
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_index_order() {
        assert_eq!(index_order(&[4, 1, 2]), vec![3, 1, 2]);
        assert_eq!(index_order(&[4, 0, 2]), vec![2, 1, 1]);
        assert_eq!(index_order(&[-8, 8, 1]), vec![2, 2, 1]);
    }

    #[test]
    fn test_compute_order_row_major() {
        let order = compute_order(&[4, 5], &[&[5, 1]]);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_compute_order_output_dominates() {
        // output column-major, input row-major: output wins
        let order = compute_order(&[4, 5], &[&[1, 4], &[5, 1]]);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_compute_order_size_one_last() {
        let order = compute_order(&[4, 1, 5], &[&[5, 20, 1]]);
        assert_eq!(order[2], 1);
    }

    #[test]
    fn test_compute_order_negative_strides() {
        let order = compute_order(&[4, 5], &[&[-1, -4]]);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_fuse_dims_contiguous() {
        // innermost-first row-major [2, 3, 4] -> ordered dims [4, 3, 2]
        let strides: Vec<StrideVec> = vec![smallvec![1, 4, 12]];
        assert_eq!(fuse_dims(&[4, 3, 2], &strides), vec![24, 1, 1]);
    }

    #[test]
    fn test_fuse_dims_blocked_by_second_operand() {
        let strides: Vec<StrideVec> = vec![smallvec![1, 4], smallvec![3, 1]];
        assert_eq!(fuse_dims(&[4, 3], &strides), vec![4, 3]);
    }

    #[test]
    fn test_build_plan_row_major_collapses() {
        let plan = build_plan(&[2, 3, 4], &[&[96, 32, 8], &[96, 32, 8]]);
        assert_eq!(plan.dims, vec![24]);
        assert_eq!(plan.strides[0].as_slice(), &[8]);
        assert_eq!(plan.strides[1].as_slice(), &[8]);
    }

    #[test]
    fn test_build_plan_transposed_input() {
        // output row-major [3, 2], input is a transposed row-major [2, 3]
        let plan = build_plan(&[3, 2], &[&[2, 1], &[1, 3]]);
        assert_eq!(plan.dims, vec![2, 3]);
        assert_eq!(plan.strides[0].as_slice(), &[1, 2]);
        assert_eq!(plan.strides[1].as_slice(), &[3, 1]);
    }

    #[test]
    fn test_build_plan_drops_unit_axes() {
        let plan = build_plan(&[1, 5, 1], &[&[5, 1, 1]]);
        assert_eq!(plan.dims, vec![5]);
        let scalar = build_plan(&[], &[&[]]);
        assert!(scalar.dims.is_empty());
    }
}
