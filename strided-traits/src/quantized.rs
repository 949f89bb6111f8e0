//! Quantized and sub-byte packed storage units.
//!
//! These are plain storage newtypes: the affine parameters (scale, zero
//! point) live with the array, not with each element. Sub-byte types pack
//! several logical values into one byte, and the byte is the unit every
//! strided kernel moves.

use bytemuck::{Pod, Zeroable};

/// Affine-quantized signed 8-bit value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct QInt8(pub i8);

/// Affine-quantized unsigned 8-bit value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct QUInt8(pub u8);

/// Affine-quantized signed 32-bit value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct QInt32(pub i32);

/// Two unsigned 4-bit values packed into one byte, low nibble first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct QUInt4x2(pub u8);

impl QUInt4x2 {
    /// Pack two nibbles. Bits above the low four of each input are dropped.
    pub const fn pack(lo: u8, hi: u8) -> Self {
        Self((lo & 0x0f) | ((hi & 0x0f) << 4))
    }

    pub const fn lo(self) -> u8 {
        self.0 & 0x0f
    }

    pub const fn hi(self) -> u8 {
        self.0 >> 4
    }
}

/// Four unsigned 2-bit values packed into one byte, lowest bits first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct QUInt2x4(pub u8);

impl QUInt2x4 {
    pub const fn pack(values: [u8; 4]) -> Self {
        Self(
            (values[0] & 0b11)
                | ((values[1] & 0b11) << 2)
                | ((values[2] & 0b11) << 4)
                | ((values[3] & 0b11) << 6),
        )
    }

    /// Value in lane `lane` (0..4).
    ///
    /// # Panics
    /// Panics if `lane >= 4`.
    pub fn get(self, lane: usize) -> u8 {
        assert!(lane < 4, "lane {} out of range for quint2x4", lane);
        (self.0 >> (2 * lane)) & 0b11
    }
}
