//! Portable SIMD library for stable Rust.
//!
//! This crate provides a way to write SIMD operations once and have them
//! evaluated using the best instruction set available on the current system,
//! selected at runtime.
//!
//! ## Basic workflow
//!
//! 1. Define a struct containing the operation's parameters and implement
//!    the [`SimdOp`] trait for it. The [`eval`](SimdOp::eval) method expresses
//!    the computation using the capability traits from the [`ops`] module,
//!    with the instruction set abstracted behind the [`Isa`] argument.
//! 2. Call [`dispatch`](SimdOp::dispatch) on an instance of the struct. This
//!    detects the available instruction sets and evaluates the operation with
//!    the preferred one.
//!
//! The key types are:
//!
//! - [`Isa`]: the entry point for a particular instruction set. Provides
//!   access to operations for each supported element type.
//! - [`NumOps`](ops::NumOps): operations on SIMD vectors (load, store,
//!   arithmetic, comparisons).
//! - [`MaskOps`](ops::MaskOps): operations on the masks produced by
//!   comparisons.
//! - [`Simd`] and [`Mask`]: the vector and mask values themselves. These are
//!   opaque except for conversion to arrays for inspection.
//!
//! ## Supported instruction sets
//!
//! - AVX2 on x86-64, selected when the CPU supports it
//! - Neon on Arm 64
//! - SIMD128 on WebAssembly, if the `simd128` target feature is enabled at
//!   compile time
//! - A generic fallback which uses portable code that the compiler can
//!   auto-vectorize

mod arch;
mod dispatch;
mod elem;
mod iter;
pub mod ops;
mod simd;
mod writer;

pub use dispatch::{SimdOp, dispatch};
pub use elem::{Elem, WrappingAdd};
pub use iter::{Iter, SimdIterable};
pub use ops::Isa;
pub use simd::{Mask, Simd};
pub use writer::SliceWriter;

/// Assert that two SIMD vectors or masks contain the same elements.
#[cfg(test)]
macro_rules! assert_simd_eq {
    ($x:expr, $y:expr) => {
        assert_eq!($x.to_array(), $y.to_array());
    };
}

#[cfg(test)]
pub(crate) use assert_simd_eq;

#[cfg(test)]
pub(crate) use dispatch::test_simd_op;
