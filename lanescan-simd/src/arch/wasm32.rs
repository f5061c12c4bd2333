use std::arch::wasm32::{
    f32x4_add, f32x4_eq, f32x4_ge, f32x4_gt, f32x4_le, f32x4_lt, f32x4_mul, f32x4_splat, f32x4_sub,
    i32x4_add, i32x4_bitmask, i32x4_eq, i32x4_ge, i32x4_gt, i32x4_mul, i32x4_shuffle, i32x4_splat,
    i32x4_sub, v128, v128_and, v128_any_true, v128_bitselect, v128_load, v128_or, v128_store,
};
use std::mem::transmute;

use super::{lanes, simd_type};
use crate::ops::{Isa, MaskOps, NumOps};
use crate::{Mask, Simd};

simd_type!(F32x4, v128, f32, M32, Wasm32Isa);
simd_type!(I32x4, v128, i32, M32, Wasm32Isa);

/// Mask for vectors with 32-bit lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct M32(v128);

impl Mask for M32 {
    type Array = [bool; 4];

    #[inline]
    fn to_array(self) -> Self::Array {
        let array = unsafe { transmute::<Self, [i32; 4]>(self) };
        std::array::from_fn(|i| array[i] != 0)
    }
}

#[derive(Copy, Clone)]
pub struct Wasm32Isa {
    _private: (),
}

impl Wasm32Isa {
    pub fn new() -> Option<Self> {
        Some(Wasm32Isa { _private: () })
    }
}

// Safety: This module is only compiled if the `simd128` target feature is
// enabled at build time.
unsafe impl Isa for Wasm32Isa {
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
        fn len(self) -> usize {
            lanes::<$simd>()
        }

        #[inline]
        fn mask_ops(self) -> impl MaskOps<M32> {
            self
        }

        #[inline]
        fn first_n_mask(self, n: usize) -> M32 {
            let mask: [i32; 4] = std::array::from_fn(|i| if i < n { -1 } else { 0 });
            M32(unsafe { v128_load(mask.as_ptr() as *const v128) })
        }

        #[inline]
        unsafe fn load_ptr_mask(self, ptr: *const $elem, mask: M32) -> $simd {
            let mask_array = mask.to_array();
            let mut vec = <Self as NumOps<$elem>>::zero(self).to_array();
            for i in 0..mask_array.len() {
                if mask_array[i] {
                    vec[i] = *ptr.add(i);
                }
            }
            self.load_ptr(vec.as_ref().as_ptr())
        }

        #[inline]
        unsafe fn store_ptr_mask(self, x: $simd, ptr: *mut $elem, mask: M32) {
            let mask_array = mask.to_array();
            let x_array = x.to_array();
            for i in 0..<Self as NumOps<$elem>>::len(self) {
                if mask_array[i] {
                    *ptr.add(i) = x_array[i];
                }
            }
        }

        #[inline]
        unsafe fn load_ptr(self, ptr: *const $elem) -> $simd {
            $simd(unsafe { v128_load(ptr as *const v128) })
        }

        #[inline]
        fn select(self, x: $simd, y: $simd, mask: M32) -> $simd {
            $simd(v128_bitselect(x.0, y.0, mask.0))
        }

        #[inline]
        unsafe fn store_ptr(self, x: $simd, ptr: *mut $elem) {
            unsafe { v128_store(ptr as *mut v128, x.0) }
        }

        #[inline]
        fn reverse(self, x: $simd) -> $simd {
            $simd(i32x4_shuffle::<3, 2, 1, 0>(x.0, x.0))
        }
    };
}

unsafe impl NumOps<f32> for Wasm32Isa {
    simd_ops_common!(F32x4, f32);

    #[inline]
    fn add(self, x: F32x4, y: F32x4) -> F32x4 {
        F32x4(f32x4_add(x.0, y.0))
    }

    #[inline]
    fn sub(self, x: F32x4, y: F32x4) -> F32x4 {
        F32x4(f32x4_sub(x.0, y.0))
    }

    #[inline]
    fn mul(self, x: F32x4, y: F32x4) -> F32x4 {
        F32x4(f32x4_mul(x.0, y.0))
    }

    #[inline]
    fn lt(self, x: F32x4, y: F32x4) -> M32 {
        M32(f32x4_lt(x.0, y.0))
    }

    #[inline]
    fn le(self, x: F32x4, y: F32x4) -> M32 {
        M32(f32x4_le(x.0, y.0))
    }

    #[inline]
    fn eq(self, x: F32x4, y: F32x4) -> M32 {
        M32(f32x4_eq(x.0, y.0))
    }

    #[inline]
    fn ge(self, x: F32x4, y: F32x4) -> M32 {
        M32(f32x4_ge(x.0, y.0))
    }

    #[inline]
    fn gt(self, x: F32x4, y: F32x4) -> M32 {
        M32(f32x4_gt(x.0, y.0))
    }

    #[inline]
    fn splat(self, x: f32) -> F32x4 {
        F32x4(f32x4_splat(x))
    }
}

unsafe impl NumOps<i32> for Wasm32Isa {
    simd_ops_common!(I32x4, i32);

    #[inline]
    fn add(self, x: I32x4, y: I32x4) -> I32x4 {
        I32x4(i32x4_add(x.0, y.0))
    }

    #[inline]
    fn sub(self, x: I32x4, y: I32x4) -> I32x4 {
        I32x4(i32x4_sub(x.0, y.0))
    }

    #[inline]
    fn mul(self, x: I32x4, y: I32x4) -> I32x4 {
        I32x4(i32x4_mul(x.0, y.0))
    }

    #[inline]
    fn eq(self, x: I32x4, y: I32x4) -> M32 {
        M32(i32x4_eq(x.0, y.0))
    }

    #[inline]
    fn ge(self, x: I32x4, y: I32x4) -> M32 {
        M32(i32x4_ge(x.0, y.0))
    }

    #[inline]
    fn gt(self, x: I32x4, y: I32x4) -> M32 {
        M32(i32x4_gt(x.0, y.0))
    }

    #[inline]
    fn splat(self, x: i32) -> I32x4 {
        I32x4(i32x4_splat(x))
    }
}

unsafe impl MaskOps<M32> for Wasm32Isa {
    #[inline]
    fn and(self, x: M32, y: M32) -> M32 {
        M32(v128_and(x.0, y.0))
    }

    #[inline]
    fn or(self, x: M32, y: M32) -> M32 {
        M32(v128_or(x.0, y.0))
    }

    #[inline]
    fn any_true(self, x: M32) -> bool {
        v128_any_true(x.0)
    }

    #[inline]
    fn first_true(self, x: M32) -> Option<usize> {
        let bits = i32x4_bitmask(x.0) as u32;
        if bits != 0 {
            Some(bits.trailing_zeros() as usize)
        } else {
            None
        }
    }
}
