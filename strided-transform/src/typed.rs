//! Runtime element-type dispatch.
//!
//! [`TypedArray`] owns one [`StridedArray`] of a concrete element type chosen
//! at run time. Every operation matches on the variant once and runs the
//! statically-typed kernel for that type. Quantized variants go through their
//! own arm so their [`QuantParams`] are carried over to the result. The float8
//! tags have no typed instantiation: they are stored as raw bytes and every
//! operation rejects them before any kernel runs.

use std::any::Any;

use half::{bf16, f16};
use num_complex::{Complex32, Complex64};
use strided_traits::{QInt32, QInt8, QUInt2x4, QUInt4x2, QUInt8};

use crate::atleast::promote_owned;
use crate::config::TransformConfig;
use crate::flip::{flip_with, fliplr_with, flipud_with};
use crate::roll::roll_with;
use crate::rot90::rot90_with;
use crate::{Element, Result, ScalarType, StridedArray, StridedError};

/// Affine quantization parameters: `real = scale * (stored - zero_point)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantParams {
    pub scale: f64,
    pub zero_point: i64,
}

impl Default for QuantParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zero_point: 0,
        }
    }
}

/// Quantized storage together with its parameters.
#[derive(Debug, Clone)]
pub struct QuantizedArray<Q> {
    pub values: StridedArray<Q>,
    pub params: QuantParams,
}

impl<Q: Copy + PartialEq> PartialEq for QuantizedArray<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.values == other.values
    }
}

/// Raw bytes of an element type without a typed instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueArray {
    pub dtype: ScalarType,
    pub storage: StridedArray<u8>,
}

/// A strided array whose element type is known only at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Bool(StridedArray<bool>),
    U8(StridedArray<u8>),
    I8(StridedArray<i8>),
    I16(StridedArray<i16>),
    U16(StridedArray<u16>),
    I32(StridedArray<i32>),
    U32(StridedArray<u32>),
    I64(StridedArray<i64>),
    U64(StridedArray<u64>),
    F16(StridedArray<f16>),
    BF16(StridedArray<bf16>),
    F32(StridedArray<f32>),
    F64(StridedArray<f64>),
    C32(StridedArray<Complex32>),
    C64(StridedArray<Complex64>),
    QInt8(QuantizedArray<QInt8>),
    QUInt8(QuantizedArray<QUInt8>),
    QInt32(QuantizedArray<QInt32>),
    QUInt4x2(QuantizedArray<QUInt4x2>),
    QUInt2x4(QuantizedArray<QUInt2x4>),
    Opaque(OpaqueArray),
}

/// Apply `$body` (an expression producing a new `StridedArray` of the same
/// element type from the borrowed array `$a`) to whichever variant is held.
macro_rules! map_ref {
    ($self:expr, $op:literal, |$a:ident| $body:expr) => {
        match $self {
            TypedArray::Bool($a) => TypedArray::Bool($body),
            TypedArray::U8($a) => TypedArray::U8($body),
            TypedArray::I8($a) => TypedArray::I8($body),
            TypedArray::I16($a) => TypedArray::I16($body),
            TypedArray::U16($a) => TypedArray::U16($body),
            TypedArray::I32($a) => TypedArray::I32($body),
            TypedArray::U32($a) => TypedArray::U32($body),
            TypedArray::I64($a) => TypedArray::I64($body),
            TypedArray::U64($a) => TypedArray::U64($body),
            TypedArray::F16($a) => TypedArray::F16($body),
            TypedArray::BF16($a) => TypedArray::BF16($body),
            TypedArray::F32($a) => TypedArray::F32($body),
            TypedArray::F64($a) => TypedArray::F64($body),
            TypedArray::C32($a) => TypedArray::C32($body),
            TypedArray::C64($a) => TypedArray::C64($body),
            TypedArray::QInt8(q) => {
                let $a = &q.values;
                TypedArray::QInt8(QuantizedArray { values: $body, params: q.params })
            }
            TypedArray::QUInt8(q) => {
                let $a = &q.values;
                TypedArray::QUInt8(QuantizedArray { values: $body, params: q.params })
            }
            TypedArray::QInt32(q) => {
                let $a = &q.values;
                TypedArray::QInt32(QuantizedArray { values: $body, params: q.params })
            }
            TypedArray::QUInt4x2(q) => {
                let $a = &q.values;
                TypedArray::QUInt4x2(QuantizedArray { values: $body, params: q.params })
            }
            TypedArray::QUInt2x4(q) => {
                let $a = &q.values;
                TypedArray::QUInt2x4(QuantizedArray { values: $body, params: q.params })
            }
            TypedArray::Opaque(o) => {
                return Err(StridedError::NotImplemented {
                    op: $op,
                    dtype: o.dtype,
                })
            }
        }
    };
}

/// Like `map_ref!`, but `$a` is the array moved out of `$self`.
macro_rules! map_owned {
    ($self:expr, $op:literal, |$a:ident| $body:expr) => {
        match $self {
            TypedArray::Bool($a) => TypedArray::Bool($body),
            TypedArray::U8($a) => TypedArray::U8($body),
            TypedArray::I8($a) => TypedArray::I8($body),
            TypedArray::I16($a) => TypedArray::I16($body),
            TypedArray::U16($a) => TypedArray::U16($body),
            TypedArray::I32($a) => TypedArray::I32($body),
            TypedArray::U32($a) => TypedArray::U32($body),
            TypedArray::I64($a) => TypedArray::I64($body),
            TypedArray::U64($a) => TypedArray::U64($body),
            TypedArray::F16($a) => TypedArray::F16($body),
            TypedArray::BF16($a) => TypedArray::BF16($body),
            TypedArray::F32($a) => TypedArray::F32($body),
            TypedArray::F64($a) => TypedArray::F64($body),
            TypedArray::C32($a) => TypedArray::C32($body),
            TypedArray::C64($a) => TypedArray::C64($body),
            TypedArray::QInt8(q) => {
                let params = q.params;
                let $a = q.values;
                TypedArray::QInt8(QuantizedArray { values: $body, params })
            }
            TypedArray::QUInt8(q) => {
                let params = q.params;
                let $a = q.values;
                TypedArray::QUInt8(QuantizedArray { values: $body, params })
            }
            TypedArray::QInt32(q) => {
                let params = q.params;
                let $a = q.values;
                TypedArray::QInt32(QuantizedArray { values: $body, params })
            }
            TypedArray::QUInt4x2(q) => {
                let params = q.params;
                let $a = q.values;
                TypedArray::QUInt4x2(QuantizedArray { values: $body, params })
            }
            TypedArray::QUInt2x4(q) => {
                let params = q.params;
                let $a = q.values;
                TypedArray::QUInt2x4(QuantizedArray { values: $body, params })
            }
            TypedArray::Opaque(o) => {
                return Err(StridedError::NotImplemented {
                    op: $op,
                    dtype: o.dtype,
                })
            }
        }
    };
}

/// Evaluate `$body` on the held array, whatever its element type.
macro_rules! with_array {
    ($self:expr, |$a:ident| $body:expr) => {
        match $self {
            TypedArray::Bool($a) => $body,
            TypedArray::U8($a) => $body,
            TypedArray::I8($a) => $body,
            TypedArray::I16($a) => $body,
            TypedArray::U16($a) => $body,
            TypedArray::I32($a) => $body,
            TypedArray::U32($a) => $body,
            TypedArray::I64($a) => $body,
            TypedArray::U64($a) => $body,
            TypedArray::F16($a) => $body,
            TypedArray::BF16($a) => $body,
            TypedArray::F32($a) => $body,
            TypedArray::F64($a) => $body,
            TypedArray::C32($a) => $body,
            TypedArray::C64($a) => $body,
            TypedArray::QInt8(QuantizedArray { values: $a, .. }) => $body,
            TypedArray::QUInt8(QuantizedArray { values: $a, .. }) => $body,
            TypedArray::QInt32(QuantizedArray { values: $a, .. }) => $body,
            TypedArray::QUInt4x2(QuantizedArray { values: $a, .. }) => $body,
            TypedArray::QUInt2x4(QuantizedArray { values: $a, .. }) => $body,
            TypedArray::Opaque(OpaqueArray { storage: $a, .. }) => $body,
        }
    };
}

fn pod_array<T: bytemuck::Pod>(bytes: &[u8], dims: &[usize]) -> Result<StridedArray<T>> {
    StridedArray::from_vec(bytemuck::pod_collect_to_vec(bytes), dims)
}

fn quantized<Q: bytemuck::Pod>(bytes: &[u8], dims: &[usize]) -> Result<QuantizedArray<Q>> {
    Ok(QuantizedArray {
        values: pod_array(bytes, dims)?,
        params: QuantParams::default(),
    })
}

impl TypedArray {
    /// Build a row-major array from raw native-endian bytes.
    ///
    /// `bytes` must hold exactly `product(dims) * dtype.element_size()` bytes.
    /// Booleans must be stored as 0 or 1. Quantized arrays start with
    /// [`QuantParams::default`].
    pub fn from_bytes(dtype: ScalarType, bytes: &[u8], dims: &[usize]) -> Result<Self> {
        let numel: usize = dims.iter().product();
        let expected = numel * dtype.element_size();
        if bytes.len() != expected {
            return Err(StridedError::ByteLengthMismatch {
                expected,
                found: bytes.len(),
            });
        }
        Ok(match dtype {
            ScalarType::Bool => {
                let values = bytes
                    .iter()
                    .map(|&b| match b {
                        0 => Ok(false),
                        1 => Ok(true),
                        other => Err(StridedError::InvalidBool(other)),
                    })
                    .collect::<Result<Vec<bool>>>()?;
                TypedArray::Bool(StridedArray::from_vec(values, dims)?)
            }
            ScalarType::U8 => TypedArray::U8(pod_array(bytes, dims)?),
            ScalarType::I8 => TypedArray::I8(pod_array(bytes, dims)?),
            ScalarType::I16 => TypedArray::I16(pod_array(bytes, dims)?),
            ScalarType::U16 => TypedArray::U16(pod_array(bytes, dims)?),
            ScalarType::I32 => TypedArray::I32(pod_array(bytes, dims)?),
            ScalarType::U32 => TypedArray::U32(pod_array(bytes, dims)?),
            ScalarType::I64 => TypedArray::I64(pod_array(bytes, dims)?),
            ScalarType::U64 => TypedArray::U64(pod_array(bytes, dims)?),
            ScalarType::F16 => TypedArray::F16(pod_array(bytes, dims)?),
            ScalarType::BF16 => TypedArray::BF16(pod_array(bytes, dims)?),
            ScalarType::F32 => TypedArray::F32(pod_array(bytes, dims)?),
            ScalarType::F64 => TypedArray::F64(pod_array(bytes, dims)?),
            ScalarType::ComplexF32 => TypedArray::C32(pod_array(bytes, dims)?),
            ScalarType::ComplexF64 => TypedArray::C64(pod_array(bytes, dims)?),
            ScalarType::QInt8 => TypedArray::QInt8(quantized(bytes, dims)?),
            ScalarType::QUInt8 => TypedArray::QUInt8(quantized(bytes, dims)?),
            ScalarType::QInt32 => TypedArray::QInt32(quantized(bytes, dims)?),
            ScalarType::QUInt4x2 => TypedArray::QUInt4x2(quantized(bytes, dims)?),
            ScalarType::QUInt2x4 => TypedArray::QUInt2x4(quantized(bytes, dims)?),
            ScalarType::Float8E4M3 | ScalarType::Float8E5M2 => TypedArray::Opaque(OpaqueArray {
                dtype,
                storage: StridedArray::from_vec(bytes.to_vec(), dims)?,
            }),
        })
    }

    /// Wrap quantized storage with its parameters.
    pub fn quantized<Q>(values: StridedArray<Q>, params: QuantParams) -> Self
    where
        QuantizedArray<Q>: Into<TypedArray>,
    {
        QuantizedArray { values, params }.into()
    }

    pub fn dtype(&self) -> ScalarType {
        match self {
            TypedArray::Opaque(o) => o.dtype,
            TypedArray::Bool(_) => ScalarType::Bool,
            TypedArray::U8(_) => ScalarType::U8,
            TypedArray::I8(_) => ScalarType::I8,
            TypedArray::I16(_) => ScalarType::I16,
            TypedArray::U16(_) => ScalarType::U16,
            TypedArray::I32(_) => ScalarType::I32,
            TypedArray::U32(_) => ScalarType::U32,
            TypedArray::I64(_) => ScalarType::I64,
            TypedArray::U64(_) => ScalarType::U64,
            TypedArray::F16(_) => ScalarType::F16,
            TypedArray::BF16(_) => ScalarType::BF16,
            TypedArray::F32(_) => ScalarType::F32,
            TypedArray::F64(_) => ScalarType::F64,
            TypedArray::C32(_) => ScalarType::ComplexF32,
            TypedArray::C64(_) => ScalarType::ComplexF64,
            TypedArray::QInt8(_) => ScalarType::QInt8,
            TypedArray::QUInt8(_) => ScalarType::QUInt8,
            TypedArray::QInt32(_) => ScalarType::QInt32,
            TypedArray::QUInt4x2(_) => ScalarType::QUInt4x2,
            TypedArray::QUInt2x4(_) => ScalarType::QUInt2x4,
        }
    }

    pub fn dims(&self) -> &[usize] {
        with_array!(self, |a| a.dims())
    }

    pub fn ndim(&self) -> usize {
        self.dims().len()
    }

    pub fn len(&self) -> usize {
        self.dims().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Quantization parameters, if this is a quantized array.
    pub fn quant_params(&self) -> Option<QuantParams> {
        match self {
            TypedArray::QInt8(q) => Some(q.params),
            TypedArray::QUInt8(q) => Some(q.params),
            TypedArray::QInt32(q) => Some(q.params),
            TypedArray::QUInt4x2(q) => Some(q.params),
            TypedArray::QUInt2x4(q) => Some(q.params),
            _ => None,
        }
    }

    pub fn set_quant_params(&mut self, params: QuantParams) -> Result<()> {
        let slot = match self {
            TypedArray::QInt8(q) => &mut q.params,
            TypedArray::QUInt8(q) => &mut q.params,
            TypedArray::QInt32(q) => &mut q.params,
            TypedArray::QUInt4x2(q) => &mut q.params,
            TypedArray::QUInt2x4(q) => &mut q.params,
            other => {
                return Err(StridedError::NotImplemented {
                    op: "set_quant_params",
                    dtype: other.dtype(),
                })
            }
        };
        *slot = params;
        Ok(())
    }

    /// Borrow the held array as `StridedArray<T>`.
    pub fn as_array<T: Element>(&self) -> Result<&StridedArray<T>> {
        let found = self.dtype();
        let mismatch = StridedError::TypeMismatch {
            expected: T::DTYPE,
            found,
        };
        if T::DTYPE != found {
            return Err(mismatch);
        }
        let any: &dyn Any = with_array!(self, |a| a as &dyn Any);
        any.downcast_ref::<StridedArray<T>>().ok_or(mismatch)
    }

    /// Take the held array as `StridedArray<T>`, dropping any quantization
    /// parameters.
    pub fn downcast<T: Element>(self) -> Result<StridedArray<T>> {
        let found = self.dtype();
        let mismatch = StridedError::TypeMismatch {
            expected: T::DTYPE,
            found,
        };
        if T::DTYPE != found {
            return Err(mismatch);
        }
        let any: Box<dyn Any> = with_array!(self, |a| Box::new(a) as Box<dyn Any>);
        any.downcast::<StridedArray<T>>()
            .map(|b| *b)
            .map_err(|_| mismatch)
    }

    // ------------------------------------------------------------------
    // Transformations
    // ------------------------------------------------------------------

    pub fn flip(&self, dims: &[isize]) -> Result<Self> {
        self.flip_with(dims, &TransformConfig::default())
    }

    pub fn flip_with(&self, dims: &[isize], config: &TransformConfig) -> Result<Self> {
        Ok(map_ref!(self, "flip", |a| flip_with(&a.view(), dims, config)?))
    }

    pub fn fliplr(&self) -> Result<Self> {
        self.fliplr_with(&TransformConfig::default())
    }

    pub fn fliplr_with(&self, config: &TransformConfig) -> Result<Self> {
        Ok(map_ref!(self, "fliplr", |a| fliplr_with(&a.view(), config)?))
    }

    pub fn flipud(&self) -> Result<Self> {
        self.flipud_with(&TransformConfig::default())
    }

    pub fn flipud_with(&self, config: &TransformConfig) -> Result<Self> {
        Ok(map_ref!(self, "flipud", |a| flipud_with(&a.view(), config)?))
    }

    pub fn roll(&self, shifts: &[isize], dims: &[isize]) -> Result<Self> {
        self.roll_with(shifts, dims, &TransformConfig::default())
    }

    pub fn roll_with(&self, shifts: &[isize], dims: &[isize], config: &TransformConfig) -> Result<Self> {
        Ok(map_ref!(self, "roll", |a| roll_with(&a.view(), shifts, dims, config)?))
    }

    pub fn rot90(&self, k: i64, dims: &[isize]) -> Result<Self> {
        self.rot90_with(k, dims, &TransformConfig::default())
    }

    pub fn rot90_with(&self, k: i64, dims: &[isize], config: &TransformConfig) -> Result<Self> {
        Ok(map_ref!(self, "rot90", |a| rot90_with(&a.view(), k, dims, config)?))
    }

    pub fn atleast_1d(self) -> Result<Self> {
        Ok(map_owned!(self, "atleast_1d", |a| promote_owned(a, 1)?))
    }

    pub fn atleast_2d(self) -> Result<Self> {
        Ok(map_owned!(self, "atleast_2d", |a| promote_owned(a, 2)?))
    }

    pub fn atleast_3d(self) -> Result<Self> {
        Ok(map_owned!(self, "atleast_3d", |a| promote_owned(a, 3)?))
    }
}

macro_rules! impl_from_array {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<StridedArray<$t>> for TypedArray {
            fn from(a: StridedArray<$t>) -> Self {
                TypedArray::$variant(a)
            }
        })*
    };
}

impl_from_array!(
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
    Complex32 => C32,
    Complex64 => C64,
);

macro_rules! impl_from_quantized {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<QuantizedArray<$t>> for TypedArray {
            fn from(q: QuantizedArray<$t>) -> Self {
                TypedArray::$variant(q)
            }
        })*
    };
}

impl_from_quantized!(
    QInt8 => QInt8,
    QUInt8 => QUInt8,
    QInt32 => QInt32,
    QUInt4x2 => QUInt4x2,
    QUInt2x4 => QUInt2x4,
);
