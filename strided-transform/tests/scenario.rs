//! The 2x3 walkthrough `[[1, 2, 3], [4, 5, 6]]` under every kernel setting.

use strided_transform::{
    flip_with, roll_with, rot90_with, FlipKernelKind, StridedArray, TransformConfig,
};

fn sample() -> StridedArray<i32> {
    StridedArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap()
}

fn configs() -> [TransformConfig; 4] {
    [
        TransformConfig::default(),
        TransformConfig::default().with_grain_size(1),
        TransformConfig::default().with_flip_kernel(FlipKernelKind::Recompute),
        TransformConfig::default()
            .with_flip_kernel(FlipKernelKind::Recompute)
            .with_grain_size(1),
    ]
}

#[test]
fn test_flip_last_axis() {
    for cfg in configs() {
        let f = flip_with(&sample().view(), &[1], &cfg).unwrap();
        assert_eq!(f.dims(), &[2, 3]);
        assert_eq!(f.to_vec(), vec![3, 2, 1, 6, 5, 4]);
    }
}

#[test]
fn test_flip_both_axes() {
    for cfg in configs() {
        let f = flip_with(&sample().view(), &[0, 1], &cfg).unwrap();
        assert_eq!(f.to_vec(), vec![6, 5, 4, 3, 2, 1]);
    }
}

#[test]
fn test_roll_by_one() {
    for cfg in configs() {
        let r = roll_with(&sample().view(), &[1], &[1], &cfg).unwrap();
        assert_eq!(r.to_vec(), vec![3, 1, 2, 6, 4, 5]);
    }
}

#[test]
fn test_rot90_quarter_turn() {
    for cfg in configs() {
        let r = rot90_with(&sample().view(), 1, &[0, 1], &cfg).unwrap();
        assert_eq!(r.dims(), &[3, 2]);
        assert_eq!(r.get(&[0, 0]), 3);
        assert_eq!(r.get(&[0, 1]), 6);
        assert_eq!(r.get(&[1, 0]), 2);
        assert_eq!(r.get(&[1, 1]), 5);
        assert_eq!(r.get(&[2, 0]), 1);
        assert_eq!(r.get(&[2, 1]), 4);
    }
}

#[test]
fn test_results_never_alias_input() {
    let a = sample();
    let f = flip_with(&a.view(), &[], &TransformConfig::default()).unwrap();
    assert_ne!(f.data().as_ptr(), a.data().as_ptr());
    let r = roll_with(&a.view(), &[0], &[0], &TransformConfig::default()).unwrap();
    assert_ne!(r.data().as_ptr(), a.data().as_ptr());
}
