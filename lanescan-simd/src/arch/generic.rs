use std::array;

use super::lanes;
use crate::ops::{Isa, MaskOps, NumOps};
use crate::{Mask, Simd};

// Size of SIMD vector in 32-bit lanes.
const LEN_X32: usize = 4;

macro_rules! simd_type {
    ($simd:ident, $elem:ty, $len:expr) => {
        #[repr(align(16))]
        #[derive(Copy, Clone, Debug)]
        pub struct $simd([$elem; $len]);

        impl From<[$elem; $len]> for $simd {
            fn from(val: [$elem; $len]) -> $simd {
                $simd(val)
            }
        }
    };
}

// Define SIMD vector types.
simd_type!(F32x4, f32, LEN_X32);
simd_type!(I32x4, i32, LEN_X32);

// Define the mask vector type for vectors with 32-bit lanes.
simd_type!(M32, i32, LEN_X32);

/// ISA implemented using portable scalar operations, which the compiler may
/// be able to auto-vectorize.
///
/// This is the fallback when no native SIMD instruction set is available.
#[derive(Copy, Clone)]
pub struct GenericIsa {
    _private: (),
}

impl GenericIsa {
    pub fn new() -> Self {
        GenericIsa { _private: () }
    }
}

impl Default for GenericIsa {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: Instructions used by generic ISA are always supported.
unsafe impl Isa for GenericIsa {
    type F32 = F32x4;
    type I32 = I32x4;

    fn f32(self) -> impl NumOps<f32, Simd = Self::F32> {
        self
    }

    fn i32(self) -> impl NumOps<i32, Simd = Self::I32> {
        self
    }
}

macro_rules! simd_ops_common {
    ($simd:ident, $elem:ty) => {
        type Simd = $simd;

        #[inline]
        fn mask_ops(self) -> impl MaskOps<M32> {
            self
        }

        #[inline]
        fn len(self) -> usize {
            lanes::<$simd>()
        }

        #[inline]
        fn first_n_mask(self, n: usize) -> M32 {
            let mask = std::array::from_fn(|i| if i < n { !0 } else { 0 });
            M32(mask)
        }

        #[inline]
        unsafe fn load_ptr_mask(self, ptr: *const $elem, mask: M32) -> $simd {
            let mask_array = mask.0;
            let mut vec = <Self as NumOps<$elem>>::zero(self).0;
            for i in 0..mask_array.len() {
                if mask_array[i] != 0 {
                    vec[i] = *ptr.add(i);
                }
            }
            self.load_ptr(vec.as_ref().as_ptr())
        }

        #[inline]
        unsafe fn store_ptr_mask(self, x: $simd, ptr: *mut $elem, mask: M32) {
            let mask_array = mask.0;
            let x_array = x.0;
            for i in 0..<Self as NumOps<$elem>>::len(self) {
                if mask_array[i] != 0 {
                    *ptr.add(i) = x_array[i];
                }
            }
        }

        #[inline]
        fn eq(self, x: $simd, y: $simd) -> M32 {
            let xs = array::from_fn(|i| if x.0[i] == y.0[i] { !0 } else { 0 });
            M32(xs)
        }

        #[inline]
        fn ge(self, x: $simd, y: $simd) -> M32 {
            let xs = array::from_fn(|i| if x.0[i] >= y.0[i] { !0 } else { 0 });
            M32(xs)
        }

        #[inline]
        fn gt(self, x: $simd, y: $simd) -> M32 {
            let xs = array::from_fn(|i| if x.0[i] > y.0[i] { !0 } else { 0 });
            M32(xs)
        }

        #[inline]
        fn splat(self, x: $elem) -> $simd {
            $simd([x; LEN_X32])
        }

        #[inline]
        unsafe fn load_ptr(self, ptr: *const $elem) -> $simd {
            let xs = array::from_fn(|i| *ptr.add(i));
            $simd(xs)
        }

        #[inline]
        fn select(self, x: $simd, y: $simd, mask: M32) -> $simd {
            let xs = array::from_fn(|i| if mask.0[i] != 0 { x.0[i] } else { y.0[i] });
            $simd(xs)
        }

        #[inline]
        unsafe fn store_ptr(self, x: $simd, ptr: *mut $elem) {
            for i in 0..LEN_X32 {
                *ptr.add(i) = x.0[i];
            }
        }

        #[inline]
        fn reverse(self, x: $simd) -> $simd {
            let xs = array::from_fn(|i| x.0[LEN_X32 - 1 - i]);
            $simd(xs)
        }
    };
}

unsafe impl NumOps<f32> for GenericIsa {
    simd_ops_common!(F32x4, f32);

    #[inline]
    fn add(self, x: F32x4, y: F32x4) -> F32x4 {
        let xs = array::from_fn(|i| x.0[i] + y.0[i]);
        F32x4(xs)
    }

    #[inline]
    fn sub(self, x: F32x4, y: F32x4) -> F32x4 {
        let xs = array::from_fn(|i| x.0[i] - y.0[i]);
        F32x4(xs)
    }

    #[inline]
    fn mul(self, x: F32x4, y: F32x4) -> F32x4 {
        let xs = array::from_fn(|i| x.0[i] * y.0[i]);
        F32x4(xs)
    }
}

unsafe impl NumOps<i32> for GenericIsa {
    simd_ops_common!(I32x4, i32);

    // Integer arithmetic wraps, matching native SIMD instructions.

    #[inline]
    fn add(self, x: I32x4, y: I32x4) -> I32x4 {
        let xs = array::from_fn(|i| x.0[i].wrapping_add(y.0[i]));
        I32x4(xs)
    }

    #[inline]
    fn sub(self, x: I32x4, y: I32x4) -> I32x4 {
        let xs = array::from_fn(|i| x.0[i].wrapping_sub(y.0[i]));
        I32x4(xs)
    }

    #[inline]
    fn mul(self, x: I32x4, y: I32x4) -> I32x4 {
        let xs = array::from_fn(|i| x.0[i].wrapping_mul(y.0[i]));
        I32x4(xs)
    }
}

impl Mask for M32 {
    type Array = [bool; LEN_X32];

    #[inline]
    fn to_array(self) -> Self::Array {
        let array = self.0;
        array::from_fn(|i| array[i] != 0)
    }
}

unsafe impl MaskOps<M32> for GenericIsa {
    #[inline]
    fn and(self, x: M32, y: M32) -> M32 {
        let xs = array::from_fn(|i| x.0[i] & y.0[i]);
        M32(xs)
    }

    #[inline]
    fn or(self, x: M32, y: M32) -> M32 {
        let xs = array::from_fn(|i| x.0[i] | y.0[i]);
        M32(xs)
    }
}

macro_rules! impl_simd {
    ($simd:ty, $elem:ty) => {
        impl Simd for $simd {
            type Mask = M32;
            type Elem = $elem;
            type Array = [$elem; LEN_X32];
            type Isa = GenericIsa;

            #[inline]
            fn to_array(self) -> Self::Array {
                self.0
            }
        }
    };
}

impl_simd!(F32x4, f32);
impl_simd!(I32x4, i32);
