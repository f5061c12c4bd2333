//! Architecture-specific implementations of the SIMD traits.

pub(crate) mod generic;

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

#[cfg(target_arch = "wasm32")]
#[cfg(target_feature = "simd128")]
pub(crate) mod wasm32;

use crate::Simd;

/// Return the number of lanes in SIMD vector `S`.
pub(crate) const fn lanes<S: Simd>() -> usize {
    std::mem::size_of::<S>() / std::mem::size_of::<S::Elem>()
}

/// Define a wrapper around a native SIMD type which implements [`Simd`].
///
/// The wrapper hides the native type and associates the vector with an
/// element type, a mask type and the [`Isa`](crate::Isa) it belongs to.
#[allow(unused_macros)]
macro_rules! simd_type {
    ($name:ident, $native:ty, $elem:ty, $mask:ty, $isa:ty) => {
        #[derive(Copy, Clone, Debug)]
        #[repr(transparent)]
        pub struct $name($native);

        impl From<$native> for $name {
            fn from(x: $native) -> Self {
                $name(x)
            }
        }

        impl crate::Simd for $name {
            type Array = [$elem; std::mem::size_of::<$native>() / std::mem::size_of::<$elem>()];
            type Elem = $elem;
            type Mask = $mask;
            type Isa = $isa;

            #[inline]
            fn to_array(self) -> Self::Array {
                unsafe { std::mem::transmute::<Self, Self::Array>(self) }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use simd_type;
