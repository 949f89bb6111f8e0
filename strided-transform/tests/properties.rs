use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_transform::{
    flip_with, roll_with, rot90_with, FlipKernelKind, StridedArray, StridedView, TransformConfig,
};

fn configs() -> Vec<TransformConfig> {
    let mut out = Vec::new();
    for kind in [FlipKernelKind::Gather, FlipKernelKind::Recompute] {
        for grain in [1, 7, usize::MAX] {
            out.push(TransformConfig::default().with_flip_kernel(kind).with_grain_size(grain));
        }
    }
    out
}

fn random_dims(rng: &mut StdRng, max_rank: usize, max_extent: usize) -> Vec<usize> {
    let rank = rng.gen_range(1..=max_rank);
    (0..rank).map(|_| rng.gen_range(1..=max_extent)).collect()
}

fn random_array(rng: &mut StdRng, dims: &[usize]) -> StridedArray<i64> {
    StridedArray::from_fn_row_major(dims, |_| rng.gen_range(-1000..1000))
}

fn random_axes(rng: &mut StdRng, rank: usize) -> Vec<isize> {
    let mut axes = Vec::new();
    for d in 0..rank as isize {
        if !rng.gen_bool(0.5) {
            continue;
        }
        // mix in negative spellings of the same axis
        axes.push(if rng.gen_bool(0.5) { d - rank as isize } else { d });
    }
    axes
}

/// Reference flip by index mirroring through `get`.
fn naive_flip(src: &StridedView<i64>, axes: &[usize]) -> Vec<i64> {
    let dims = src.dims().to_vec();
    let n: usize = dims.iter().product();
    let mut out = Vec::with_capacity(n);
    let mut idx = vec![0usize; dims.len()];
    for _ in 0..n {
        let mirrored: Vec<usize> = idx
            .iter()
            .enumerate()
            .map(|(d, &i)| if axes.contains(&d) { dims[d] - 1 - i } else { i })
            .collect();
        out.push(src.get(&mirrored));
        for d in (0..dims.len()).rev() {
            idx[d] += 1;
            if idx[d] < dims[d] {
                break;
            }
            idx[d] = 0;
        }
    }
    out
}

#[test]
fn test_flip_matches_reference() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..30 {
        let dims = random_dims(&mut rng, 4, 5);
        let a = random_array(&mut rng, &dims);
        let axes = random_axes(&mut rng, dims.len());
        let wrapped: Vec<usize> = axes
            .iter()
            .map(|&d| if d < 0 { (d + dims.len() as isize) as usize } else { d as usize })
            .collect();
        let expected = naive_flip(&a.view(), &wrapped);
        for cfg in configs() {
            let f = flip_with(&a.view(), &axes, &cfg).unwrap();
            assert!(f.is_contiguous());
            assert_eq!(f.data(), expected.as_slice(), "dims {:?} axes {:?} {:?}", dims, axes, cfg);
        }
    }
}

#[test]
fn test_flip_involution() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..30 {
        let dims = random_dims(&mut rng, 5, 4);
        let a = random_array(&mut rng, &dims);
        let axes = random_axes(&mut rng, dims.len());
        for cfg in configs() {
            let once = flip_with(&a.view(), &axes, &cfg).unwrap();
            let twice = flip_with(&once.view(), &axes, &cfg).unwrap();
            assert_eq!(twice, a);
        }
    }
}

#[test]
fn test_flip_kernels_agree_on_strided_views() {
    let mut rng = StdRng::seed_from_u64(3);
    let gather = TransformConfig::default().with_flip_kernel(FlipKernelKind::Gather);
    let recompute = TransformConfig::default().with_flip_kernel(FlipKernelKind::Recompute);
    for _ in 0..40 {
        let dims = random_dims(&mut rng, 4, 6);
        let a = random_array(&mut rng, &dims);
        let rank = dims.len();

        // random permutation, then a random narrow on one axis
        let mut perm: Vec<usize> = (0..rank).collect();
        for i in (1..rank).rev() {
            perm.swap(i, rng.gen_range(0..=i));
        }
        let permuted = a.view().permute(&perm).unwrap();
        let axis = rng.gen_range(0..rank);
        let size = permuted.dims()[axis];
        let start = rng.gen_range(0..size);
        let len = rng.gen_range(1..=size - start);
        let view = permuted.narrow(axis, start, len).unwrap();

        let axes = random_axes(&mut rng, rank);
        let g = flip_with(&view, &axes, &gather).unwrap();
        let r = flip_with(&view, &axes, &recompute).unwrap();
        assert_eq!(g.data(), r.data());
    }
}

#[test]
fn test_flip_large_parallel() {
    let dims = [48, 64, 40];
    let a = StridedArray::<f32>::from_fn_row_major(&dims, |idx| {
        (idx[0] * 10_000 + idx[1] * 100 + idx[2]) as f32
    });
    let t = a.view().permute(&[2, 0, 1]).unwrap();
    let gather = TransformConfig::default().with_gather_grain_size(256);
    let recompute = TransformConfig::default()
        .with_flip_kernel(FlipKernelKind::Recompute)
        .with_recompute_grain_size(256);
    let g = flip_with(&t, &[0, 2], &gather).unwrap();
    let r = flip_with(&t, &[0, 2], &recompute).unwrap();
    assert_eq!(g.data(), r.data());
    // g[i, j, k] = t[39 - i, j, 63 - k] = a[j, 63 - k, 39 - i]
    assert_eq!(g.get(&[1, 2, 3]), (2 * 10_000 + 60 * 100 + 38) as f32);
}

#[test]
fn test_roll_periodicity() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..30 {
        let dims = random_dims(&mut rng, 3, 6);
        let a = random_array(&mut rng, &dims);
        let axis = rng.gen_range(0..dims.len());
        let size = dims[axis] as isize;
        let shift = rng.gen_range(-20..20);
        for grain in [1, usize::MAX] {
            let cfg = TransformConfig::default().with_grain_size(grain);
            let r = roll_with(&a.view(), &[shift], &[axis as isize], &cfg).unwrap();
            let r2 = roll_with(&a.view(), &[shift + size], &[axis as isize], &cfg).unwrap();
            let r3 = roll_with(&a.view(), &[shift - 3 * size], &[axis as isize], &cfg).unwrap();
            assert_eq!(r, r2);
            assert_eq!(r, r3);
            let zero = roll_with(&a.view(), &[0], &[axis as isize], &cfg).unwrap();
            assert_eq!(zero, a);
            // rolling back undoes the shift
            let back = roll_with(&r.view(), &[-shift], &[axis as isize], &cfg).unwrap();
            assert_eq!(back, a);
        }
    }
}

#[test]
fn test_rot90_group_law() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let mut dims = random_dims(&mut rng, 4, 5);
        if dims.len() < 2 {
            dims.push(3);
        }
        let rank = dims.len();
        let a = random_array(&mut rng, &dims);
        let d0 = rng.gen_range(0..rank);
        let mut d1 = rng.gen_range(0..rank);
        while d1 == d0 {
            d1 = rng.gen_range(0..rank);
        }
        let plane = [d0 as isize, d1 as isize];
        for cfg in configs() {
            for k in -9i64..9 {
                assert_eq!(
                    rot90_with(&a.view(), k, &plane, &cfg).unwrap(),
                    rot90_with(&a.view(), k.rem_euclid(4), &plane, &cfg).unwrap(),
                    "k = {}",
                    k
                );
            }
            let once = rot90_with(&a.view(), 1, &plane, &cfg).unwrap();
            let twice = rot90_with(&once.view(), 1, &plane, &cfg).unwrap();
            let half_turn = rot90_with(&a.view(), 2, &plane, &cfg).unwrap();
            assert_eq!(twice, half_turn);
            assert_eq!(half_turn, flip_with(&a.view(), &plane, &cfg).unwrap());

            let back = rot90_with(&once.view(), -1, &plane, &cfg).unwrap();
            assert_eq!(back, a);
        }
    }
}

#[test]
fn test_empty_arrays_keep_shape() {
    for dims in [vec![0], vec![3, 0], vec![0, 4, 2], vec![2, 3, 0]] {
        let a = StridedArray::<u16>::row_major(&dims);
        let v = a.view();
        for cfg in configs() {
            let all: Vec<isize> = (0..dims.len() as isize).collect();
            assert_eq!(flip_with(&v, &all, &cfg).unwrap().dims(), dims.as_slice());
            assert_eq!(roll_with(&v, &[5], &[0], &cfg).unwrap().dims(), dims.as_slice());
            assert_eq!(roll_with(&v, &[5], &[], &cfg).unwrap().dims(), dims.as_slice());
            if dims.len() >= 2 {
                let r = rot90_with(&v, 1, &[0, 1], &cfg).unwrap();
                let mut expected = dims.clone();
                expected.swap(0, 1);
                assert_eq!(r.dims(), expected.as_slice());
                assert!(r.is_empty());
            }
        }
    }
}

#[test]
fn test_non_contiguous_matches_dense_copy() {
    let mut rng = StdRng::seed_from_u64(6);
    let base = random_array(&mut rng, &[6, 7, 5]);
    let view = base
        .view()
        .transpose(0, 2)
        .unwrap()
        .narrow(1, 2, 4)
        .unwrap();
    let dense = StridedArray::from_vec(view.to_vec(), view.dims()).unwrap();

    for cfg in configs() {
        assert_eq!(
            flip_with(&view, &[0, 2], &cfg).unwrap(),
            flip_with(&dense.view(), &[0, 2], &cfg).unwrap()
        );
        assert_eq!(
            roll_with(&view, &[3, -2], &[1, 0], &cfg).unwrap(),
            roll_with(&dense.view(), &[3, -2], &[1, 0], &cfg).unwrap()
        );
        assert_eq!(
            roll_with(&view, &[11], &[], &cfg).unwrap(),
            roll_with(&dense.view(), &[11], &[], &cfg).unwrap()
        );
        for k in 0..4 {
            assert_eq!(
                rot90_with(&view, k, &[2, 0], &cfg).unwrap(),
                rot90_with(&dense.view(), k, &[2, 0], &cfg).unwrap()
            );
        }
    }
}
