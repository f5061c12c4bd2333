use std::arch::aarch64::{
    float32x4_t, int32x4_t, uint32x4_t, vaddq_f32, vaddq_s32, vaddvq_f32, vaddvq_s32, vandq_u32,
    vbslq_f32, vbslq_s32, vceqq_f32, vceqq_s32, vcgeq_f32, vcgeq_s32, vcgtq_f32, vcgtq_s32,
    vcleq_f32, vcltq_f32, vdupq_n_f32, vdupq_n_s32, vextq_f32, vextq_s32, vget_lane_u64,
    vld1q_f32, vld1q_s32, vld1q_u32, vmaxvq_u32, vmovn_u32, vmulq_f32, vmulq_s32, vorrq_u32,
    vreinterpret_u64_u16, vrev64q_f32, vrev64q_s32, vst1q_f32, vst1q_s32, vsubq_f32, vsubq_s32,
};
use std::mem::transmute;

use crate::ops::{Isa, MaskOps, NumOps};
use crate::{Mask, Simd};

#[derive(Copy, Clone)]
pub struct ArmNeonIsa {
    _private: (),
}

impl ArmNeonIsa {
    pub fn new() -> Option<Self> {
        Some(ArmNeonIsa { _private: () })
    }
}

// Safety: Neon is supported, as it is a required feature of aarch64.
unsafe impl Isa for ArmNeonIsa {
    type F32 = float32x4_t;
    type I32 = int32x4_t;

    fn f32(self) -> impl NumOps<f32, Simd = Self::F32> {
        self
    }

    fn i32(self) -> impl NumOps<i32, Simd = Self::I32> {
        self
    }
}

macro_rules! simd_ops_common {
    ($simd:ty) => {
        type Simd = $simd;

        #[inline]
        fn len(self) -> usize {
            super::lanes::<$simd>()
        }

        #[inline]
        fn mask_ops(self) -> impl MaskOps<uint32x4_t> {
            self
        }

        #[inline]
        fn first_n_mask(self, n: usize) -> uint32x4_t {
            let mask: [u32; 4] = std::array::from_fn(|i| if i < n { u32::MAX } else { 0 });
            unsafe { vld1q_u32(mask.as_ptr()) }
        }

        #[inline]
        unsafe fn load_ptr_mask(self, ptr: *const <$simd as Simd>::Elem, mask: uint32x4_t) -> $simd {
            type Elem = <$simd as Simd>::Elem;

            let mask_array = Mask::to_array(mask);
            let mut vec = Simd::to_array(<Self as NumOps<Elem>>::zero(self));
            for i in 0..mask_array.len() {
                if mask_array[i] {
                    vec[i] = *ptr.add(i);
                }
            }
            self.load_ptr(vec.as_ref().as_ptr())
        }

        #[inline]
        unsafe fn store_ptr_mask(
            self,
            x: $simd,
            ptr: *mut <$simd as Simd>::Elem,
            mask: uint32x4_t,
        ) {
            type Elem = <$simd as Simd>::Elem;

            let mask_array = Mask::to_array(mask);
            let x_array = Simd::to_array(x);
            for i in 0..<Self as NumOps<Elem>>::len(self) {
                if mask_array[i] {
                    *ptr.add(i) = x_array[i];
                }
            }
        }
    };
}

unsafe impl NumOps<f32> for ArmNeonIsa {
    simd_ops_common!(float32x4_t);

    #[inline]
    fn add(self, x: float32x4_t, y: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(x, y) }
    }

    #[inline]
    fn sub(self, x: float32x4_t, y: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(x, y) }
    }

    #[inline]
    fn mul(self, x: float32x4_t, y: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(x, y) }
    }

    #[inline]
    fn lt(self, x: float32x4_t, y: float32x4_t) -> uint32x4_t {
        unsafe { vcltq_f32(x, y) }
    }

    #[inline]
    fn le(self, x: float32x4_t, y: float32x4_t) -> uint32x4_t {
        unsafe { vcleq_f32(x, y) }
    }

    #[inline]
    fn eq(self, x: float32x4_t, y: float32x4_t) -> uint32x4_t {
        unsafe { vceqq_f32(x, y) }
    }

    #[inline]
    fn ge(self, x: float32x4_t, y: float32x4_t) -> uint32x4_t {
        unsafe { vcgeq_f32(x, y) }
    }

    #[inline]
    fn gt(self, x: float32x4_t, y: float32x4_t) -> uint32x4_t {
        unsafe { vcgtq_f32(x, y) }
    }

    #[inline]
    fn splat(self, x: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(x) }
    }

    #[inline]
    unsafe fn load_ptr(self, ptr: *const f32) -> float32x4_t {
        unsafe { vld1q_f32(ptr) }
    }

    #[inline]
    fn select(
        self,
        x: float32x4_t,
        y: float32x4_t,
        mask: <float32x4_t as Simd>::Mask,
    ) -> float32x4_t {
        unsafe { vbslq_f32(mask, x, y) }
    }

    #[inline]
    unsafe fn store_ptr(self, x: float32x4_t, ptr: *mut f32) {
        unsafe { vst1q_f32(ptr, x) }
    }

    #[inline]
    fn reverse(self, x: float32x4_t) -> float32x4_t {
        // Reverse within each 64-bit half, then swap the halves.
        unsafe {
            let half_rev = vrev64q_f32(x);
            vextq_f32::<2>(half_rev, half_rev)
        }
    }

    #[inline]
    fn sum(self, x: float32x4_t) -> f32 {
        unsafe { vaddvq_f32(x) }
    }
}

unsafe impl NumOps<i32> for ArmNeonIsa {
    simd_ops_common!(int32x4_t);

    #[inline]
    fn add(self, x: int32x4_t, y: int32x4_t) -> int32x4_t {
        unsafe { vaddq_s32(x, y) }
    }

    #[inline]
    fn sub(self, x: int32x4_t, y: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(x, y) }
    }

    #[inline]
    fn mul(self, x: int32x4_t, y: int32x4_t) -> int32x4_t {
        unsafe { vmulq_s32(x, y) }
    }

    #[inline]
    fn splat(self, x: i32) -> int32x4_t {
        unsafe { vdupq_n_s32(x) }
    }

    #[inline]
    fn eq(self, x: int32x4_t, y: int32x4_t) -> uint32x4_t {
        unsafe { vceqq_s32(x, y) }
    }

    #[inline]
    fn ge(self, x: int32x4_t, y: int32x4_t) -> uint32x4_t {
        unsafe { vcgeq_s32(x, y) }
    }

    #[inline]
    fn gt(self, x: int32x4_t, y: int32x4_t) -> uint32x4_t {
        unsafe { vcgtq_s32(x, y) }
    }

    #[inline]
    unsafe fn load_ptr(self, ptr: *const i32) -> int32x4_t {
        unsafe { vld1q_s32(ptr) }
    }

    #[inline]
    fn select(self, x: int32x4_t, y: int32x4_t, mask: <int32x4_t as Simd>::Mask) -> int32x4_t {
        unsafe { vbslq_s32(mask, x, y) }
    }

    #[inline]
    unsafe fn store_ptr(self, x: int32x4_t, ptr: *mut i32) {
        unsafe { vst1q_s32(ptr, x) }
    }

    #[inline]
    fn reverse(self, x: int32x4_t) -> int32x4_t {
        // Reverse within each 64-bit half, then swap the halves.
        unsafe {
            let half_rev = vrev64q_s32(x);
            vextq_s32::<2>(half_rev, half_rev)
        }
    }

    #[inline]
    fn sum(self, x: int32x4_t) -> i32 {
        unsafe { vaddvq_s32(x) }
    }
}

impl Mask for uint32x4_t {
    type Array = [bool; 4];

    #[inline]
    fn to_array(self) -> Self::Array {
        let array = unsafe { transmute::<Self, [u32; 4]>(self) };
        std::array::from_fn(|i| array[i] != 0)
    }
}

unsafe impl MaskOps<uint32x4_t> for ArmNeonIsa {
    #[inline]
    fn and(self, x: uint32x4_t, y: uint32x4_t) -> uint32x4_t {
        unsafe { vandq_u32(x, y) }
    }

    #[inline]
    fn or(self, x: uint32x4_t, y: uint32x4_t) -> uint32x4_t {
        unsafe { vorrq_u32(x, y) }
    }

    #[inline]
    fn any_true(self, x: uint32x4_t) -> bool {
        unsafe { vmaxvq_u32(x) != 0 }
    }

    #[inline]
    fn first_true(self, x: uint32x4_t) -> Option<usize> {
        // Narrow each 32-bit lane to 16 bits and treat the result as a 64-bit
        // scalar, so the lowest set lane can be found with a single
        // count-trailing-zeros.
        let bits = unsafe { vget_lane_u64::<0>(vreinterpret_u64_u16(vmovn_u32(x))) };
        if bits != 0 {
            Some(bits.trailing_zeros() as usize / 16)
        } else {
            None
        }
    }
}

macro_rules! impl_simd {
    ($simd:ident, $elem:ty) => {
        impl Simd for $simd {
            type Elem = $elem;
            type Array = [$elem; 4];
            type Mask = uint32x4_t;
            type Isa = ArmNeonIsa;

            #[inline]
            fn to_array(self) -> Self::Array {
                unsafe { transmute::<Self, Self::Array>(self) }
            }
        }
    };
}

impl_simd!(float32x4_t, f32);
impl_simd!(int32x4_t, i32);
