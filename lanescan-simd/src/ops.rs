//! Traits for operations on SIMD vectors.
//!
//! The entry point is the [`Isa`] trait, an implementation of which is passed
//! to SIMD operations when evaluated. This has methods for each of the
//! supported element types which return the implementation of operations on
//! SIMD vectors with that element type.

use std::mem::MaybeUninit;

use crate::elem::Elem;
use crate::simd::{Mask, Simd};

/// Entry point for performing SIMD operations using a particular Instruction
/// Set Architecture (ISA).
///
/// Implementations of this trait are types which can only be instantiated
/// if the instruction set is available. They are usually zero-sized and thus
/// free to copy.
///
/// # Safety
///
/// Implementations must ensure they can only be constructed if the
/// instruction set is supported on the current system.
pub unsafe trait Isa: Copy {
    /// SIMD vector with `f32` elements.
    type F32: Simd<Elem = f32, Isa = Self>;

    /// SIMD vector with `i32` elements.
    type I32: Simd<Elem = i32, Isa = Self>;

    /// Operations on SIMD vectors with `f32` elements.
    fn f32(self) -> impl NumOps<f32, Simd = Self::F32>;

    /// Operations on SIMD vectors with `i32` elements.
    fn i32(self) -> impl NumOps<i32, Simd = Self::I32>;
}

/// Get the [`NumOps`] implementation from an [`Isa`] for a given element type.
///
/// This trait is useful for writing SIMD operations which are generic over the
/// element type. It is implemented for all of the element types supported in
/// SIMD vectors.
///
/// # Example
///
/// This example shows how to use [`GetNumOps`] to write a vectorized `Total`
/// operation which works on both `f32` and `i32` slices.
///
/// ```
/// use lanescan_simd::{Isa, SimdIterable, SimdOp};
/// use lanescan_simd::ops::{GetNumOps, NumOps};
///
/// struct Total<'a, T>(&'a [T]);
///
/// impl<T: GetNumOps> SimdOp for Total<'_, T> {
///   type Output = T;
///
///   #[inline(always)]
///   fn eval<I: Isa>(self, isa: I) -> Self::Output {
///     let ops = T::num_ops(isa);
///
///     // Build `ops.len()` partial sums in parallel, then reduce them to a
///     // single value at the end.
///     let partial_sums = self
///         .0
///         .simd_iter(ops)
///         .fold(ops.zero(), |sum, x| ops.add(sum, x));
///     ops.sum(partial_sums)
///   }
/// }
///
/// let vals: Vec<_> = (1..20i32).collect();
/// let sum = Total(&vals).dispatch();
/// assert_eq!(sum, vals.iter().sum());
/// ```
pub trait GetNumOps
where
    Self: Elem + 'static,
{
    /// Return the [`NumOps`] implementation from a SIMD [`Isa`] that provides
    /// operations on vectors containing elements of type `Self`.
    fn num_ops<I: Isa>(isa: I) -> impl NumOps<Self, Simd: Simd<Isa = I>>;
}

macro_rules! impl_get_num_ops {
    ($type:ident) => {
        impl GetNumOps for $type {
            fn num_ops<I: Isa>(isa: I) -> impl NumOps<Self, Simd: Simd<Isa = I>> {
                isa.$type()
            }
        }
    };
}
impl_get_num_ops!(f32);
impl_get_num_ops!(i32);

/// SIMD operations on a [`Mask`] vector.
///
/// # Safety
///
/// Implementations must ensure they can only be constructed if the
/// instruction set is supported on the current system.
pub unsafe trait MaskOps<M: Mask>: Copy {
    /// Compute `x & y`.
    fn and(self, x: M, y: M) -> M;

    /// Compute `x | y`.
    fn or(self, x: M, y: M) -> M;

    /// Return true if any lane in the mask is set.
    #[inline]
    fn any_true(self, x: M) -> bool {
        x.to_array().as_ref().iter().any(|&b| b)
    }

    /// Return the position of the lowest set lane in the mask, if any.
    ///
    /// This is the SIMD equivalent of a count-trailing-zeros instruction
    /// applied to a bitmask of the lanes.
    #[inline]
    fn first_true(self, x: M) -> Option<usize> {
        x.to_array().as_ref().iter().position(|&b| b)
    }
}

/// Operations available on all SIMD vector types.
///
/// This trait provides core operations available on all SIMD vector types:
///
/// - Load from and store into memory
/// - Creating a new vector filled with zeros or a specific value
/// - Combining elements from two vectors according to a mask
/// - Add, subtract and multiply
/// - Comparison (equality, less than, greater than etc.)
/// - Lane reversal and horizontal summation
///
/// # Safety
///
/// Implementations must ensure they can only be constructed if the
/// instruction set is supported on the current system.
#[allow(clippy::len_without_is_empty)]
pub unsafe trait NumOps<T: Elem>: Copy {
    /// SIMD vector containing lanes of type `T`.
    type Simd: Simd<Elem = T>;

    /// Return the implementation of mask operations for the mask vector used
    /// by this SIMD type.
    fn mask_ops(self) -> impl MaskOps<<Self::Simd as Simd>::Mask>;

    /// Return the number of elements in the vector.
    fn len(self) -> usize;

    /// Compute `x + y`.
    fn add(self, x: Self::Simd, y: Self::Simd) -> Self::Simd;

    /// Compute `x - y`.
    fn sub(self, x: Self::Simd, y: Self::Simd) -> Self::Simd;

    /// Compute `x * y`.
    fn mul(self, x: Self::Simd, y: Self::Simd) -> Self::Simd;

    /// Create a new vector with all lanes set to zero.
    fn zero(self) -> Self::Simd {
        self.splat(T::default())
    }

    /// Create a new vector with all lanes set to `x`.
    fn splat(self, x: T) -> Self::Simd;

    /// Return a mask indicating whether elements in `x` are less than `y`.
    #[inline]
    fn lt(self, x: Self::Simd, y: Self::Simd) -> <Self::Simd as Simd>::Mask {
        self.gt(y, x)
    }

    /// Return a mask indicating whether elements in `x` are less or equal to `y`.
    #[inline]
    fn le(self, x: Self::Simd, y: Self::Simd) -> <Self::Simd as Simd>::Mask {
        self.ge(y, x)
    }

    /// Return a mask indicating whether elements in `x` are equal to `y`.
    fn eq(self, x: Self::Simd, y: Self::Simd) -> <Self::Simd as Simd>::Mask;

    /// Return a mask indicating whether elements in `x` are greater or equal to `y`.
    fn ge(self, x: Self::Simd, y: Self::Simd) -> <Self::Simd as Simd>::Mask;

    /// Return a mask indicating whether elements in `x` are greater than `y`.
    fn gt(self, x: Self::Simd, y: Self::Simd) -> <Self::Simd as Simd>::Mask;

    /// Return a mask with the first `n` lanes set to true.
    fn first_n_mask(self, n: usize) -> <Self::Simd as Simd>::Mask;

    /// Load the first `self.len()` elements from a slice into a vector.
    ///
    /// Panics if `xs.len() < self.len()`.
    #[inline]
    fn load(self, xs: &[T]) -> Self::Simd {
        assert!(xs.len() >= self.len());
        unsafe { self.load_ptr(xs.as_ptr()) }
    }

    /// Load `N` vectors from consecutive sub-slices of `xs`.
    ///
    /// Panics if `xs.len() < self.len() * N`.
    #[inline]
    fn load_many<const N: usize>(self, xs: &[T]) -> [Self::Simd; N] {
        let v_len = self.len();
        assert!(xs.len() >= v_len * N);

        // Safety: `xs.add(i * v_len)` points to at least `v_len` elements.
        std::array::from_fn(|i| unsafe { self.load_ptr(xs.as_ptr().add(i * v_len)) })
    }

    /// Load elements from `xs` into a vector.
    ///
    /// If the vector length exceeds `xs.len()`, the tail is padded with zeros.
    ///
    /// Returns the padded vector and a mask of the lanes which were set.
    #[inline]
    fn load_pad(self, xs: &[T]) -> (Self::Simd, <Self::Simd as Simd>::Mask) {
        let n = xs.len().min(self.len());
        let mask = self.first_n_mask(n);

        // Safety: `xs.add(i)` is valid for all positions where mask is set
        let vec = unsafe { self.load_ptr_mask(xs.as_ptr(), mask) };

        (vec, mask)
    }

    /// Load vector of elements from `ptr`.
    ///
    /// `ptr` is not required to have any particular alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `self.len()` initialized elements of type `T`.
    unsafe fn load_ptr(self, ptr: *const T) -> Self::Simd;

    /// Load vector elements from `ptr` using a mask.
    ///
    /// `ptr` is not required to have any particular alignment.
    ///
    /// # Safety
    ///
    /// For each mask position `i` which is true, `ptr.add(i)` must point to
    /// an initialized element of type `T`.
    unsafe fn load_ptr_mask(self, ptr: *const T, mask: <Self::Simd as Simd>::Mask) -> Self::Simd;

    /// Select elements from `x` or `y` according to a mask.
    ///
    /// Elements are selected from `x` where the corresponding mask element
    /// is one or `y` if zero.
    fn select(self, x: Self::Simd, y: Self::Simd, mask: <Self::Simd as Simd>::Mask) -> Self::Simd;

    /// Store the values in this vector to a memory location.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `self.len()` elements.
    unsafe fn store_ptr(self, x: Self::Simd, ptr: *mut T);

    /// Store `x` into the first `self.len()` elements of `xs`.
    #[inline]
    fn store(self, x: Self::Simd, xs: &mut [T]) {
        assert!(xs.len() >= self.len());
        unsafe { self.store_ptr(x, xs.as_mut_ptr()) }
    }

    /// Store `x` into the first `self.len()` elements of `xs`.
    ///
    /// This is a variant of [`store`](NumOps::store) which takes an
    /// uninitialized slice as input and returns the initialized portion of the
    /// slice.
    #[inline]
    fn store_uninit(self, x: Self::Simd, xs: &mut [MaybeUninit<T>]) -> &mut [T] {
        let len = self.len();
        let xs_ptr = xs.as_mut_ptr() as *mut T;
        assert!(xs.len() >= len);
        unsafe {
            self.store_ptr(x, xs_ptr);

            // Safety: `store_ptr` initialized `len` elements of `xs`.
            std::slice::from_raw_parts_mut(xs_ptr, len)
        }
    }

    /// Store the values in this vector to a memory location, where the
    /// corresponding mask element is set.
    ///
    /// # Safety
    ///
    /// For each position `i` in the mask which is true, `ptr.add(i)` must point
    /// to a valid element of type `T`.
    unsafe fn store_ptr_mask(self, x: Self::Simd, ptr: *mut T, mask: <Self::Simd as Simd>::Mask);

    /// Reverse the order of the lanes in `x`.
    #[inline]
    fn reverse(self, x: Self::Simd) -> Self::Simd {
        let mut array = x.to_array();
        array.as_mut().reverse();
        self.load(array.as_ref())
    }

    /// Horizontally sum the elements in a vector.
    ///
    /// If the sum overflows, it will wrap. This choice was made to enable
    /// consistency between native intrinsics for horizontal addition and the
    /// generic implementation.
    fn sum(self, x: Self::Simd) -> T {
        let mut sum = T::default();
        for elem in x.to_array() {
            sum = sum.wrapping_add(elem);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use crate::elem::WrappingAdd;
    use crate::ops::{MaskOps, NumOps};
    use crate::{Isa, Mask, Simd, SimdOp, assert_simd_eq, test_simd_op};

    // Generate tests for operations available on all numeric types.
    macro_rules! test_num_ops {
        ($modname:ident, $elem:ident) => {
            mod $modname {
                use super::{
                    Isa, Mask, MaskOps, NumOps, Simd, SimdOp, WrappingAdd, assert_simd_eq,
                    test_simd_op,
                };

                #[test]
                fn test_load_store() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let src: Vec<_> = (0..ops.len() * 4).map(|x| x as $elem).collect();
                        let mut dst = vec![0 as $elem; src.len()];

                        for (src_chunk, dst_chunk) in
                            src.chunks(ops.len()).zip(dst.chunks_mut(ops.len()))
                        {
                            let x = ops.load(src_chunk);
                            ops.store(x, dst_chunk);
                        }

                        assert_eq!(dst, src);
                    })
                }

                #[test]
                fn test_store_uninit() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let src: Vec<_> = (0..ops.len() + 3).map(|x| x as $elem).collect();
                        let mut dest = Vec::with_capacity(src.len());

                        let x = ops.load(&src);

                        let init = ops.store_uninit(x, dest.spare_capacity_mut());
                        assert_eq!(init, &src[0..ops.len()]);
                    })
                }

                #[test]
                fn test_load_many() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let src: Vec<_> = (0..ops.len() * 4).map(|x| x as $elem).collect();

                        let xs = ops.load_many::<4>(&src);
                        for i in 0..4 {
                            assert_simd_eq!(xs[i], ops.load(&src[i * ops.len()..]));
                        }
                    })
                }

                #[test]
                fn test_load_pad() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        // Array which is shorter than vector length for all ISAs.
                        let src = [0, 1, 2].map(|x| x as $elem);

                        let (vec, mask) = ops.load_pad(&src);
                        let vec_array = vec.to_array();
                        let vec_slice = vec_array.as_ref();

                        assert_eq!(&vec_slice[..src.len()], &src);
                        for i in src.len()..vec_slice.len() {
                            assert_eq!(vec_array[i], 0 as $elem);
                        }
                        assert_eq!(mask.to_array(), ops.first_n_mask(src.len()).to_array());
                    })
                }

                #[test]
                fn test_bin_ops() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let a = 2 as $elem;
                        let b = 3 as $elem;

                        let x = ops.splat(a);
                        let y = ops.splat(b);

                        // Add
                        let expected = ops.splat(a + b);
                        let actual = ops.add(x, y);
                        assert_simd_eq!(actual, expected);

                        // Sub
                        let expected = ops.splat(b - a);
                        let actual = ops.sub(y, x);
                        assert_simd_eq!(actual, expected);

                        // Mul
                        let expected = ops.splat(a * b);
                        let actual = ops.mul(x, y);
                        assert_simd_eq!(actual, expected);
                    })
                }

                #[test]
                fn test_cmp_ops() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let x = ops.splat(1 as $elem);
                        let y = ops.splat(2 as $elem);

                        assert!(ops.eq(x, x).all_true());
                        assert!(ops.eq(x, y).all_false());
                        assert!(ops.le(x, x).all_true());
                        assert!(ops.le(x, y).all_true());
                        assert!(ops.le(y, x).all_false());
                        assert!(ops.ge(x, x).all_true());
                        assert!(ops.ge(x, y).all_false());
                        assert!(ops.gt(x, y).all_false());
                        assert!(ops.gt(y, x).all_true());
                        assert!(ops.lt(x, y).all_true());
                        assert!(ops.lt(y, x).all_false());
                    })
                }

                #[test]
                fn test_select() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let x = ops.splat(1 as $elem);
                        let y = ops.splat(2 as $elem);

                        let first_two = ops.first_n_mask(2);
                        let merged = ops.select(x, y, first_two);
                        let merged = merged.to_array();
                        let merged = merged.as_ref();

                        assert_eq!(&merged[..2], &[1 as $elem; 2]);
                        assert_eq!(&merged[2..], &vec![2 as $elem; ops.len() - 2][..]);
                    })
                }

                #[test]
                fn test_sum() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let vec: Vec<_> = (0..ops.len()).map(|x| x as $elem).collect();
                        let expected = vec
                            .iter()
                            .fold(0 as $elem, |sum, x| WrappingAdd::wrapping_add(sum, *x));

                        let x = ops.load(&vec);
                        let y = ops.sum(x);

                        assert_eq!(y, expected);
                    })
                }

                #[test]
                fn test_reverse() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();

                        let mut vec: Vec<_> = (0..ops.len()).map(|x| x as $elem).collect();
                        let x = ops.load(&vec);
                        let reversed = ops.reverse(x);

                        vec.reverse();
                        assert_simd_eq!(reversed, ops.load(&vec));
                    })
                }

                #[test]
                fn test_mask_ops() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();
                        let mask_ops = ops.mask_ops();

                        let ones = ops.first_n_mask(ops.len());
                        let zeros = ops.first_n_mask(0);
                        let first = ops.first_n_mask(1);

                        assert!(ones.all_true());
                        assert!(zeros.all_false());

                        // Bitwise and
                        assert_eq!(mask_ops.and(ones, ones).to_array(), ones.to_array());
                        assert_eq!(mask_ops.and(first, ones).to_array(), first.to_array());
                        assert_eq!(mask_ops.and(first, zeros).to_array(), zeros.to_array());

                        // Bitwise or
                        assert_eq!(mask_ops.or(zeros, zeros).to_array(), zeros.to_array());
                        assert_eq!(mask_ops.or(first, zeros).to_array(), first.to_array());
                        assert_eq!(mask_ops.or(first, ones).to_array(), ones.to_array());

                        // Any-lane test
                        assert!(mask_ops.any_true(ones));
                        assert!(mask_ops.any_true(first));
                        assert!(!mask_ops.any_true(zeros));
                    })
                }

                #[test]
                fn test_first_true() {
                    test_simd_op!(isa, {
                        let ops = isa.$elem();
                        let mask_ops = ops.mask_ops();

                        let zeros = ops.first_n_mask(0);
                        assert_eq!(mask_ops.first_true(zeros), None);

                        // A mask with a single set lane at position `k` must
                        // report `k`, not just any set lane.
                        let lanes: Vec<_> = (0..ops.len()).map(|x| x as $elem).collect();
                        let xs = ops.load(&lanes);
                        for k in 0..ops.len() {
                            let mask = ops.eq(xs, ops.splat(k as $elem));
                            assert_eq!(mask_ops.first_true(mask), Some(k));
                        }

                        // With several set lanes, the lowest wins.
                        let mask = ops.ge(xs, ops.splat(1 as $elem));
                        assert_eq!(mask_ops.first_true(mask), Some(1));
                    })
                }
            }
        };
    }

    test_num_ops!(num_ops_f32, f32);
    test_num_ops!(num_ops_i32, i32);

    #[test]
    fn test_i32_add_wraps() {
        test_simd_op!(isa, {
            let ops = isa.i32();

            let x = ops.splat(i32::MAX);
            let y = ops.splat(1);
            let expected = ops.splat(i32::MIN);

            assert_simd_eq!(ops.add(x, y), expected);
        })
    }
}
