//! Shared traits for the strided-rs ecosystem.
//!
//! This crate defines what an array element is, independent of any view or
//! kernel machinery:
//!
//! - [`Element`]: statically-typed element bound with its runtime tag
//! - [`ScalarType`]: runtime element type tag used for dtype dispatch
//! - Quantized and sub-byte packed storage units ([`QInt8`], [`QUInt8`],
//!   [`QInt32`], [`QUInt4x2`], [`QUInt2x4`])
//!
//! Downstream crates (`strided-view`, `strided-kernel`, `strided-transform`)
//! depend on this crate so that external element types can implement
//! [`Element`] without orphan rule violations.

pub mod dtype;
pub mod element;
pub mod quantized;

pub use dtype::ScalarType;
pub use element::Element;
pub use quantized::{QInt32, QInt8, QUInt2x4, QUInt4x2, QUInt8};

pub use half::{bf16, f16};
pub use num_complex::{Complex32, Complex64};
