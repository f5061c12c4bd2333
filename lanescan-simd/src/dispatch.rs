use crate::Isa;

/// A vectorized operation which can be instantiated for different instruction
/// sets.
pub trait SimdOp {
    /// The type of the operation's result.
    type Output;

    /// Evaluate the operation using the given instruction set.
    fn eval<I: Isa>(self, isa: I) -> Self::Output;

    /// Dispatch this operation using the preferred ISA for the current platform.
    fn dispatch(self) -> Self::Output
    where
        Self: Sized,
    {
        dispatch(self)
    }
}

/// Invoke a SIMD operation using the preferred ISA for the current system.
///
/// This function will check the available SIMD instruction sets and then
/// dispatch to [`SimdOp::eval`], passing the selected [`Isa`].
pub fn dispatch<Op: SimdOp>(op: Op) -> Op::Output {
    #[cfg(target_arch = "aarch64")]
    if let Some(isa) = super::arch::aarch64::ArmNeonIsa::new() {
        return op.eval(isa);
    }

    #[cfg(target_arch = "x86_64")]
    {
        // The target features enabled here must match those tested for by `Avx2Isa::new`.
        #[target_feature(enable = "avx2")]
        #[target_feature(enable = "avx")]
        #[target_feature(enable = "fma")]
        unsafe fn dispatch_avx2<Op: SimdOp>(isa: impl Isa, op: Op) -> Op::Output {
            op.eval(isa)
        }

        if let Some(isa) = super::arch::x86_64::Avx2Isa::new() {
            // Safety: AVX2 is supported
            unsafe {
                return dispatch_avx2(isa, op);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    #[cfg(target_feature = "simd128")]
    {
        if let Some(isa) = super::arch::wasm32::Wasm32Isa::new() {
            return op.eval(isa);
        }
    }

    let isa = super::arch::generic::GenericIsa::new();
    op.eval(isa)
}

/// Convenience macro for defining and evaluating a SIMD operation.
#[cfg(test)]
macro_rules! test_simd_op {
    ($isa:ident, $op:block) => {{
        struct TestOp {}

        impl SimdOp for TestOp {
            type Output = ();

            fn eval<I: Isa>(self, $isa: I) {
                $op
            }
        }

        TestOp {}.dispatch()
    }};
}

#[cfg(test)]
pub(crate) use test_simd_op;

#[cfg(test)]
mod tests {
    use crate::Isa;
    use crate::ops::NumOps;
    use crate::{Simd, SimdOp};

    #[test]
    fn test_dispatch() {
        struct Double<'a> {
            xs: &'a mut [f32],
        }

        impl SimdOp for Double<'_> {
            type Output = ();

            fn eval<I: Isa>(self, isa: I) {
                let ops = isa.f32();

                let mut chunks = self.xs.chunks_exact_mut(ops.len());
                for chunk in chunks.by_ref() {
                    let x = ops.load(chunk);
                    ops.store(ops.add(x, x), chunk);
                }
                for x in chunks.into_remainder() {
                    *x += *x;
                }
            }
        }

        // Length chosen to exercise both the vectorized loop and the
        // remainder for all ISAs.
        let mut buf: Vec<_> = (0..19).map(|x| x as f32).collect();
        let expected: Vec<_> = buf.iter().map(|x| x * 2.).collect();

        Double { xs: &mut buf }.dispatch();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_dispatch_output() {
        struct LaneCount {}

        impl SimdOp for LaneCount {
            type Output = usize;

            fn eval<I: Isa>(self, isa: I) -> usize {
                isa.i32().len()
            }
        }

        let len = LaneCount {}.dispatch();
        assert!(len >= 4);

        // `f32` and `i32` vectors have the same width.
        struct F32LaneCount {}
        impl SimdOp for F32LaneCount {
            type Output = usize;

            fn eval<I: Isa>(self, isa: I) -> usize {
                isa.f32().len()
            }
        }
        assert_eq!(F32LaneCount {}.dispatch(), len);
    }

    #[test]
    fn test_simd_op_macro() {
        use super::test_simd_op;

        test_simd_op!(isa, {
            let ops = isa.f32();
            let x = ops.splat(2.0);
            assert_eq!(x.to_array().as_ref(), &vec![2.0; ops.len()][..]);
        });
    }
}
