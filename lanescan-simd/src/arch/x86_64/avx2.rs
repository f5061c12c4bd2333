use std::arch::x86_64::{
    __m256i, _mm256_add_epi32, _mm256_add_ps, _mm256_and_ps, _mm256_and_si256, _mm256_blendv_epi8,
    _mm256_blendv_ps, _mm256_castps256_ps128, _mm256_castps_si256, _mm256_castsi256_ps,
    _mm256_cmp_ps, _mm256_cmpeq_epi32, _mm256_cmpgt_epi32, _mm256_extractf128_ps, _mm256_loadu_ps,
    _mm256_loadu_si256, _mm256_maskload_epi32, _mm256_maskload_ps, _mm256_maskstore_epi32,
    _mm256_maskstore_ps, _mm256_movemask_ps, _mm256_mul_ps, _mm256_mullo_epi32, _mm256_or_ps,
    _mm256_or_si256, _mm256_permutevar8x32_epi32, _mm256_permutevar8x32_ps, _mm256_set1_epi32,
    _mm256_set1_ps, _mm256_setr_epi32, _mm256_storeu_ps, _mm256_storeu_si256, _mm256_sub_epi32,
    _mm256_sub_ps, _mm256_testz_si256, _mm_add_ps, _mm_cvtss_f32, _mm_movehl_ps, _mm_shuffle_ps,
    _CMP_EQ_OQ, _CMP_GE_OQ, _CMP_GT_OQ, _CMP_LE_OQ, _CMP_LT_OQ,
};
use std::is_x86_feature_detected;
use std::mem::transmute;

use super::super::{lanes, simd_type};
use crate::ops::{Isa, MaskOps, NumOps};
use crate::{Mask, Simd};

simd_type!(F32x8, std::arch::x86_64::__m256, f32, F32x8, Avx2Isa);
simd_type!(I32x8, __m256i, i32, I32x8, Avx2Isa);

#[derive(Copy, Clone)]
pub struct Avx2Isa {
    _private: (),
}

impl Avx2Isa {
    pub fn new() -> Option<Self> {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            Some(Avx2Isa { _private: () })
        } else {
            None
        }
    }
}

// Safety: AVX2 is supported as `Avx2Isa::new` checks this.
unsafe impl Isa for Avx2Isa {
    type F32 = F32x8;
    type I32 = I32x8;

    fn f32(self) -> impl NumOps<f32, Simd = Self::F32> {
        self
    }

    fn i32(self) -> impl NumOps<i32, Simd = Self::I32> {
        self
    }
}

macro_rules! simd_ops_common {
    ($simd:ty, $mask:ty) => {
        type Simd = $simd;

        #[inline]
        fn len(self) -> usize {
            lanes::<$simd>()
        }

        #[inline]
        fn mask_ops(self) -> impl MaskOps<$mask> {
            self
        }
    };
}

unsafe impl NumOps<f32> for Avx2Isa {
    simd_ops_common!(F32x8, F32x8);

    #[inline]
    fn first_n_mask(self, n: usize) -> F32x8 {
        let mask: [i32; 8] = std::array::from_fn(|i| if i < n { -1 } else { 0 });
        unsafe { _mm256_loadu_ps(mask.as_ptr() as *const f32) }.into()
    }

    #[inline]
    fn add(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_add_ps(x.0, y.0) }.into()
    }

    #[inline]
    fn sub(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_sub_ps(x.0, y.0) }.into()
    }

    #[inline]
    fn mul(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_mul_ps(x.0, y.0) }.into()
    }

    #[inline]
    fn lt(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_cmp_ps(x.0, y.0, _CMP_LT_OQ) }.into()
    }

    #[inline]
    fn le(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_cmp_ps(x.0, y.0, _CMP_LE_OQ) }.into()
    }

    #[inline]
    fn eq(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_cmp_ps(x.0, y.0, _CMP_EQ_OQ) }.into()
    }

    #[inline]
    fn ge(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_cmp_ps(x.0, y.0, _CMP_GE_OQ) }.into()
    }

    #[inline]
    fn gt(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_cmp_ps(x.0, y.0, _CMP_GT_OQ) }.into()
    }

    #[inline]
    fn splat(self, x: f32) -> F32x8 {
        unsafe { _mm256_set1_ps(x) }.into()
    }

    #[inline]
    unsafe fn load_ptr(self, ptr: *const f32) -> F32x8 {
        unsafe { _mm256_loadu_ps(ptr) }.into()
    }

    #[inline]
    fn select(self, x: F32x8, y: F32x8, mask: <F32x8 as Simd>::Mask) -> F32x8 {
        unsafe { _mm256_blendv_ps(y.0, x.0, mask.0) }.into()
    }

    #[inline]
    unsafe fn load_ptr_mask(self, ptr: *const f32, mask: F32x8) -> F32x8 {
        unsafe { _mm256_maskload_ps(ptr, transmute::<F32x8, __m256i>(mask)) }.into()
    }

    #[inline]
    unsafe fn store_ptr_mask(self, x: F32x8, ptr: *mut f32, mask: F32x8) {
        unsafe { _mm256_maskstore_ps(ptr, transmute::<F32x8, __m256i>(mask), x.0) }
    }

    #[inline]
    unsafe fn store_ptr(self, x: F32x8, ptr: *mut f32) {
        unsafe { _mm256_storeu_ps(ptr, x.0) }
    }

    #[inline]
    fn reverse(self, x: F32x8) -> F32x8 {
        unsafe {
            let indices = _mm256_setr_epi32(7, 6, 5, 4, 3, 2, 1, 0);
            _mm256_permutevar8x32_ps(x.0, indices)
        }
        .into()
    }

    #[inline]
    fn sum(self, x: F32x8) -> f32 {
        // See https://stackoverflow.com/a/13222410/434243
        unsafe {
            let hi_4 = _mm256_extractf128_ps(x.0, 1);
            let lo_4 = _mm256_castps256_ps128(x.0);
            let sum_4 = _mm_add_ps(lo_4, hi_4);
            let lo_2 = sum_4;
            let hi_2 = _mm_movehl_ps(sum_4, sum_4);
            let sum_2 = _mm_add_ps(lo_2, hi_2);
            let lo = sum_2;
            let hi = _mm_shuffle_ps(sum_2, sum_2, 0x1);
            let sum = _mm_add_ps(lo, hi);
            _mm_cvtss_f32(sum)
        }
    }
}

unsafe impl NumOps<i32> for Avx2Isa {
    simd_ops_common!(I32x8, I32x8);

    #[inline]
    fn first_n_mask(self, n: usize) -> I32x8 {
        let mask: [i32; 8] = std::array::from_fn(|i| if i < n { -1 } else { 0 });
        unsafe { _mm256_loadu_si256(mask.as_ptr() as *const __m256i) }.into()
    }

    #[inline]
    fn add(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_add_epi32(x.0, y.0) }.into()
    }

    #[inline]
    fn sub(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_sub_epi32(x.0, y.0) }.into()
    }

    #[inline]
    fn mul(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_mullo_epi32(x.0, y.0) }.into()
    }

    #[inline]
    fn eq(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_cmpeq_epi32(x.0, y.0) }.into()
    }

    #[inline]
    fn ge(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe {
            let gt = _mm256_cmpgt_epi32(x.0, y.0);
            let eq = _mm256_cmpeq_epi32(x.0, y.0);
            _mm256_or_si256(gt, eq)
        }
        .into()
    }

    #[inline]
    fn gt(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_cmpgt_epi32(x.0, y.0) }.into()
    }

    #[inline]
    fn splat(self, x: i32) -> I32x8 {
        unsafe { _mm256_set1_epi32(x) }.into()
    }

    #[inline]
    unsafe fn load_ptr(self, ptr: *const i32) -> I32x8 {
        unsafe { _mm256_loadu_si256(ptr as *const __m256i) }.into()
    }

    #[inline]
    fn select(self, x: I32x8, y: I32x8, mask: <I32x8 as Simd>::Mask) -> I32x8 {
        unsafe { _mm256_blendv_epi8(y.0, x.0, mask.0) }.into()
    }

    #[inline]
    unsafe fn load_ptr_mask(self, ptr: *const i32, mask: I32x8) -> I32x8 {
        unsafe { _mm256_maskload_epi32(ptr, mask.0) }.into()
    }

    #[inline]
    unsafe fn store_ptr_mask(self, x: I32x8, ptr: *mut i32, mask: I32x8) {
        unsafe { _mm256_maskstore_epi32(ptr, mask.0, x.0) }
    }

    #[inline]
    unsafe fn store_ptr(self, x: I32x8, ptr: *mut i32) {
        unsafe { _mm256_storeu_si256(ptr as *mut __m256i, x.0) }
    }

    #[inline]
    fn reverse(self, x: I32x8) -> I32x8 {
        unsafe {
            let indices = _mm256_setr_epi32(7, 6, 5, 4, 3, 2, 1, 0);
            _mm256_permutevar8x32_epi32(x.0, indices)
        }
        .into()
    }
}

macro_rules! impl_mask {
    ($mask:ty, $elem:ty) => {
        impl Mask for $mask {
            type Array = [bool; lanes::<Self>()];

            #[inline]
            fn to_array(self) -> Self::Array {
                let array = unsafe { transmute::<Self, [$elem; lanes::<Self>()]>(self) };
                std::array::from_fn(|i| array[i] != <$elem>::default())
            }
        }
    };
}

impl_mask!(F32x8, f32);
impl_mask!(I32x8, i32);

unsafe impl MaskOps<F32x8> for Avx2Isa {
    #[inline]
    fn and(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_and_ps(x.0, y.0) }.into()
    }

    #[inline]
    fn or(self, x: F32x8, y: F32x8) -> F32x8 {
        unsafe { _mm256_or_ps(x.0, y.0) }.into()
    }

    #[inline]
    fn any_true(self, x: F32x8) -> bool {
        let bits = unsafe { _mm256_castps_si256(x.0) };
        unsafe { _mm256_testz_si256(bits, bits) == 0 }
    }

    #[inline]
    fn first_true(self, x: F32x8) -> Option<usize> {
        let bits = unsafe { _mm256_movemask_ps(x.0) } as u32;
        if bits != 0 {
            Some(bits.trailing_zeros() as usize)
        } else {
            None
        }
    }
}

unsafe impl MaskOps<I32x8> for Avx2Isa {
    #[inline]
    fn and(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_and_si256(x.0, y.0) }.into()
    }

    #[inline]
    fn or(self, x: I32x8, y: I32x8) -> I32x8 {
        unsafe { _mm256_or_si256(x.0, y.0) }.into()
    }

    #[inline]
    fn any_true(self, x: I32x8) -> bool {
        unsafe { _mm256_testz_si256(x.0, x.0) == 0 }
    }

    #[inline]
    fn first_true(self, x: I32x8) -> Option<usize> {
        // Each 32-bit lane of the mask is all-ones or all-zeroes, so the sign
        // bits collected by `movemask` have one bit per lane.
        let bits = unsafe { _mm256_movemask_ps(_mm256_castsi256_ps(x.0)) } as u32;
        if bits != 0 {
            Some(bits.trailing_zeros() as usize)
        } else {
            None
        }
    }
}
