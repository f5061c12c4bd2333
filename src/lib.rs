//! SIMD-vectorized implementations of common slice operations.
//!
//! The centerpiece is [`FindFirst`], a first-match linear search which
//! compares a group of SIMD vectors per step and needs only a single
//! any-lane test per group in the common no-match case. The crate also
//! provides vectorized elementwise addition ([`Add`]), horizontal summation
//! ([`Sum`]) and in-place reversal ([`Reverse`]).
//!
//! ## Constructing and dispatching operations
//!
//! The operations are implemented by structs which implement the
//! [`SimdOp`](lanescan_simd::SimdOp) trait from
//! [lanescan-simd](lanescan_simd). To apply an operation to data, first
//! construct the operation using the struct from this crate, then call its
//! `dispatch` method to execute it using the preferred SIMD instruction set
//! for the current system.
//!
//! All operations work on both `f32` and `i32` slices.
//!
//! ## Examples
//!
//! ### Searching for a value
//!
//! ```
//! use lanescan::FindFirst;
//! use lanescan_simd::SimdOp;
//!
//! let mut data = vec![0; 512];
//! data[20] = 5;
//! data[40] = 5;
//!
//! let index = FindFirst::new(&data, 5).dispatch();
//! assert_eq!(index, Some(20));
//!
//! let index = FindFirst::new(&data, 9).dispatch();
//! assert_eq!(index, None);
//! ```
//!
//! ### Summing a list of floats
//!
//! ```
//! use lanescan::Sum;
//! use lanescan_simd::SimdOp;
//!
//! let data = [1., 0.5, 2.0];
//! let sum = Sum::new(&data).dispatch();
//! assert_eq!(sum, 3.5);
//! ```

mod add;
mod find;
mod reverse;
mod sum;

pub use add::Add;
pub use find::FindFirst;
pub use reverse::Reverse;
pub use sum::Sum;
