use std::mem::MaybeUninit;

use lanescan_simd::ops::{GetNumOps, NumOps};
use lanescan_simd::{Isa, SimdOp, SliceWriter, WrappingAdd};

/// Computes the elementwise sum of two slices.
///
/// Integer additions wrap on overflow.
pub struct Add<'a, 'dest, T> {
    a: &'a [T],
    b: &'a [T],
    dest: &'dest mut [MaybeUninit<T>],
}

impl<'a, 'dest, T> Add<'a, 'dest, T> {
    /// Create an operation which writes `a[i] + b[i]` into `dest[i]`.
    ///
    /// Panics if `a` and `b` differ in length, or `dest` is shorter than `a`.
    pub fn new(a: &'a [T], b: &'a [T], dest: &'dest mut [MaybeUninit<T>]) -> Self {
        assert_eq!(a.len(), b.len());
        assert!(dest.len() >= a.len());
        Add { a, b, dest }
    }
}

impl<'dest, T: GetNumOps> SimdOp for Add<'_, 'dest, T> {
    type Output = &'dest mut [T];

    #[inline(always)]
    fn eval<I: Isa>(self, isa: I) -> Self::Output {
        let ops = T::num_ops(isa);

        let mut a_chunks = self.a.chunks_exact(ops.len());
        let mut b_chunks = self.b.chunks_exact(ops.len());
        let mut writer = SliceWriter::new(self.dest);

        for (a_chunk, b_chunk) in a_chunks.by_ref().zip(b_chunks.by_ref()) {
            let sum = ops.add(ops.load(a_chunk), ops.load(b_chunk));
            writer.write_vec(ops, sum);
        }

        for (a, b) in a_chunks.remainder().iter().zip(b_chunks.remainder()) {
            writer.write_scalar(WrappingAdd::wrapping_add(*a, *b));
        }

        writer.into_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use lanescan_simd::SimdOp;

    use super::Add;

    #[test]
    fn test_add_i32() {
        // Length which exercises both the vectorized loop and the scalar tail.
        let len = 37;
        let a: Vec<i32> = (0..len).collect();
        let b: Vec<i32> = (0..len).map(|x| x * 10).collect();
        let expected: Vec<i32> = a.iter().zip(&b).map(|(a, b)| a + b).collect();

        let mut dest = Vec::with_capacity(a.len());
        let sums = Add::new(&a, &b, dest.spare_capacity_mut()).dispatch();

        assert_eq!(sums, expected);
    }

    #[test]
    fn test_add_f32() {
        let len = 19;
        let a: Vec<f32> = (0..len).map(|x| x as f32).collect();
        let b: Vec<f32> = (0..len).map(|x| x as f32 * 0.5).collect();
        let expected: Vec<f32> = a.iter().zip(&b).map(|(a, b)| a + b).collect();

        let mut dest = Vec::with_capacity(a.len());
        let sums = Add::new(&a, &b, dest.spare_capacity_mut()).dispatch();

        assert_eq!(sums, expected);
    }

    #[test]
    fn test_add_i32_wraps() {
        let a = vec![i32::MAX; 9];
        let b = vec![1; 9];

        let mut dest = Vec::with_capacity(a.len());
        let sums = Add::new(&a, &b, dest.spare_capacity_mut()).dispatch();

        assert_eq!(sums, &vec![i32::MIN; 9][..]);
    }

    #[test]
    #[ignore]
    fn bench_add() {
        let len = 4096;
        let a: Vec<f32> = (0..len).map(|x| x as f32).collect();
        let b: Vec<f32> = (0..len).map(|x| x as f32 * 0.5).collect();
        let mut dest = Vec::with_capacity(len);
        let iters = 10_000;

        lanescan_bench::run_bench(10, format!("add f32 x{}", len), || {
            for _ in 0..iters {
                let sums = Add::new(
                    std::hint::black_box(&a),
                    std::hint::black_box(&b),
                    dest.spare_capacity_mut(),
                )
                .dispatch();
                std::hint::black_box(sums);
            }
        });
    }

    #[test]
    #[should_panic]
    fn test_add_length_mismatch() {
        let a = [1, 2, 3];
        let b = [1, 2];
        let mut dest = Vec::with_capacity(a.len());
        Add::new(&a, &b, dest.spare_capacity_mut());
    }
}
