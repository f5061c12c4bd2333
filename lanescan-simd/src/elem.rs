//! Traits for elements of SIMD vectors.

/// Types used as elements (or _lanes_) of SIMD vectors.
pub trait Elem: Copy + Default + WrappingAdd {}

impl Elem for f32 {}
impl Elem for i32 {}

/// Wrapping addition of numbers.
///
/// For float types, this is the same as [`std::ops::Add`]. For integer types,
/// this is the same as the type's inherent `wrapping_add` method.
pub trait WrappingAdd: Sized {
    fn wrapping_add(self, x: Self) -> Self;
}

impl WrappingAdd for i32 {
    fn wrapping_add(self, x: Self) -> Self {
        Self::wrapping_add(self, x)
    }
}

impl WrappingAdd for f32 {
    fn wrapping_add(self, x: f32) -> f32 {
        self + x
    }
}
