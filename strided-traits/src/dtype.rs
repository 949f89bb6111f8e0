//! Runtime element type tags.

use std::fmt;

/// Runtime tag naming the element type stored in an array.
///
/// Every tag has a known storage width. Not every tag has a statically-typed
/// instantiation: the float8 formats are carried as raw bytes only, and
/// operations that need typed element access reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// IEEE 754 half precision.
    F16,
    /// Brain floating point (8-bit exponent, 7-bit mantissa).
    BF16,
    F32,
    F64,
    ComplexF32,
    ComplexF64,
    /// Affine-quantized signed 8-bit.
    QInt8,
    /// Affine-quantized unsigned 8-bit.
    QUInt8,
    /// Affine-quantized signed 32-bit.
    QInt32,
    /// Two unsigned 4-bit values packed in one byte.
    QUInt4x2,
    /// Four unsigned 2-bit values packed in one byte.
    QUInt2x4,
    /// 8-bit float, 4-bit exponent, 3-bit mantissa. Raw storage only.
    Float8E4M3,
    /// 8-bit float, 5-bit exponent, 2-bit mantissa. Raw storage only.
    Float8E5M2,
}

impl ScalarType {
    /// Size of one storage unit in bytes.
    ///
    /// Sub-byte packed types report the size of the packed byte, not of the
    /// individual sub-byte values.
    pub const fn element_size(self) -> usize {
        match self {
            ScalarType::Bool
            | ScalarType::U8
            | ScalarType::I8
            | ScalarType::QInt8
            | ScalarType::QUInt8
            | ScalarType::QUInt4x2
            | ScalarType::QUInt2x4
            | ScalarType::Float8E4M3
            | ScalarType::Float8E5M2 => 1,
            ScalarType::I16 | ScalarType::U16 | ScalarType::F16 | ScalarType::BF16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 | ScalarType::QInt32 => 4,
            ScalarType::I64 | ScalarType::U64 | ScalarType::F64 | ScalarType::ComplexF32 => 8,
            ScalarType::ComplexF64 => 16,
        }
    }

    pub const fn is_quantized(self) -> bool {
        matches!(
            self,
            ScalarType::QInt8
                | ScalarType::QUInt8
                | ScalarType::QInt32
                | ScalarType::QUInt4x2
                | ScalarType::QUInt2x4
        )
    }

    /// Sub-byte packed types: several logical values share one storage byte.
    pub const fn is_sub_byte(self) -> bool {
        matches!(self, ScalarType::QUInt4x2 | ScalarType::QUInt2x4)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, ScalarType::ComplexF32 | ScalarType::ComplexF64)
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            ScalarType::F16
                | ScalarType::BF16
                | ScalarType::F32
                | ScalarType::F64
                | ScalarType::Float8E4M3
                | ScalarType::Float8E5M2
        )
    }

    /// Whether a statically-typed instantiation exists for this tag.
    pub const fn has_typed_storage(self) -> bool {
        !matches!(self, ScalarType::Float8E4M3 | ScalarType::Float8E5M2)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::U8 => "uint8",
            ScalarType::I8 => "int8",
            ScalarType::I16 => "int16",
            ScalarType::U16 => "uint16",
            ScalarType::I32 => "int32",
            ScalarType::U32 => "uint32",
            ScalarType::I64 => "int64",
            ScalarType::U64 => "uint64",
            ScalarType::F16 => "float16",
            ScalarType::BF16 => "bfloat16",
            ScalarType::F32 => "float32",
            ScalarType::F64 => "float64",
            ScalarType::ComplexF32 => "complex64",
            ScalarType::ComplexF64 => "complex128",
            ScalarType::QInt8 => "qint8",
            ScalarType::QUInt8 => "quint8",
            ScalarType::QInt32 => "qint32",
            ScalarType::QUInt4x2 => "quint4x2",
            ScalarType::QUInt2x4 => "quint2x4",
            ScalarType::Float8E4M3 => "float8_e4m3",
            ScalarType::Float8E5M2 => "float8_e5m2",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ScalarType::Bool.element_size(), 1);
        assert_eq!(ScalarType::BF16.element_size(), 2);
        assert_eq!(ScalarType::QInt32.element_size(), 4);
        assert_eq!(ScalarType::ComplexF32.element_size(), 8);
        assert_eq!(ScalarType::ComplexF64.element_size(), 16);
        // packed byte, not the 4-bit value
        assert_eq!(ScalarType::QUInt4x2.element_size(), 1);
    }

    #[test]
    fn test_classification() {
        assert!(ScalarType::QUInt2x4.is_quantized());
        assert!(ScalarType::QUInt2x4.is_sub_byte());
        assert!(!ScalarType::QInt8.is_sub_byte());
        assert!(ScalarType::ComplexF64.is_complex());
        assert!(ScalarType::F16.is_floating_point());
        assert!(!ScalarType::I64.is_floating_point());
        assert!(!ScalarType::Float8E5M2.has_typed_storage());
        assert!(ScalarType::F64.has_typed_storage());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarType::ComplexF64.to_string(), "complex128");
        assert_eq!(ScalarType::Float8E4M3.to_string(), "float8_e4m3");
    }
}
