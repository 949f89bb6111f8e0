//! Statically-typed element bound.

use half::{bf16, f16};
use num_complex::Complex;

use crate::dtype::ScalarType;
use crate::quantized::{QInt32, QInt8, QUInt2x4, QUInt4x2, QUInt8};

/// Trait for types that can be stored in a strided array and moved by the
/// transformation kernels.
///
/// Kernels only ever copy elements, so the bound is deliberately small:
/// `Copy` for moves, `Default` for allocating fresh outputs, `Send + Sync`
/// for sharing read-only inputs across worker threads.
///
/// `DTYPE` links the static type back to its runtime tag.
pub trait Element: Copy + Default + Send + Sync + 'static {
    const DTYPE: ScalarType;
}

macro_rules! impl_element {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(impl Element for $t {
            const DTYPE: ScalarType = ScalarType::$tag;
        })*
    };
}

impl_element!(
    bool => Bool,
    u8 => U8,
    i8 => I8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f16 => F16,
    bf16 => BF16,
    f32 => F32,
    f64 => F64,
    Complex<f32> => ComplexF32,
    Complex<f64> => ComplexF64,
    QInt8 => QInt8,
    QUInt8 => QUInt8,
    QInt32 => QInt32,
    QUInt4x2 => QUInt4x2,
    QUInt2x4 => QUInt2x4,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_of<T: Element>() -> ScalarType {
        T::DTYPE
    }

    #[test]
    fn test_standard_tags() {
        assert_eq!(tag_of::<bool>(), ScalarType::Bool);
        assert_eq!(tag_of::<i64>(), ScalarType::I64);
        assert_eq!(tag_of::<f16>(), ScalarType::F16);
        assert_eq!(tag_of::<bf16>(), ScalarType::BF16);
        assert_eq!(tag_of::<num_complex::Complex64>(), ScalarType::ComplexF64);
    }

    #[test]
    fn test_quantized_tags() {
        assert_eq!(tag_of::<QInt8>(), ScalarType::QInt8);
        assert_eq!(tag_of::<QUInt4x2>(), ScalarType::QUInt4x2);
    }

    #[test]
    fn test_tag_sizes_match_static_sizes() {
        fn check<T: Element>() {
            assert_eq!(
                std::mem::size_of::<T>(),
                T::DTYPE.element_size(),
                "size mismatch for {}",
                T::DTYPE
            );
        }
        check::<bool>();
        check::<u8>();
        check::<i16>();
        check::<u32>();
        check::<f16>();
        check::<bf16>();
        check::<f64>();
        check::<num_complex::Complex32>();
        check::<num_complex::Complex64>();
        check::<QInt8>();
        check::<QUInt8>();
        check::<QInt32>();
        check::<QUInt4x2>();
        check::<QUInt2x4>();
    }
}
