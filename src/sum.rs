use lanescan_simd::ops::{GetNumOps, NumOps};
use lanescan_simd::{Isa, SimdIterable, SimdOp};

/// Computes the sum of a sequence of numbers.
///
/// This is more efficient than `slice.iter().sum()` as it computes multiple
/// partial sums in parallel using SIMD and then sums across the SIMD lanes at
/// the end. For floats this will produce very slightly different results
/// because the additions happen in a different order. Integer sums wrap on
/// overflow.
pub struct Sum<'a, T> {
    input: &'a [T],
}

impl<'a, T> Sum<'a, T> {
    pub fn new(input: &'a [T]) -> Self {
        Sum { input }
    }
}

impl<T: GetNumOps> SimdOp for Sum<'_, T> {
    type Output = T;

    #[inline(always)]
    fn eval<I: Isa>(self, isa: I) -> Self::Output {
        let ops = T::num_ops(isa);

        // Two accumulators per step, so consecutive additions do not have to
        // wait on each other.
        let vec_sum = self.input.simd_iter(ops).fold_unroll::<2>(
            ops.zero(),
            |sum, x| ops.add(sum, x),
            |a, b| ops.add(a, b),
        );
        ops.sum(vec_sum)
    }
}

#[cfg(test)]
mod tests {
    use lanescan_simd::SimdOp;

    use super::Sum;

    #[test]
    fn test_sum_i32() {
        // Cover the unrolled loop, the per-vector loop and the masked tail.
        for len in [0usize, 1, 7, 16, 67, 256] {
            let input: Vec<i32> = (0..len as i32).collect();
            let expected: i32 = input.iter().sum();

            assert_eq!(Sum::new(&input).dispatch(), expected);
        }
    }

    #[test]
    fn test_sum_f32() {
        for len in [0usize, 1, 7, 16, 67, 256] {
            let input: Vec<f32> = (0..len).map(|x| x as f32).collect();
            let expected: f32 = input.iter().sum();

            assert_eq!(Sum::new(&input).dispatch(), expected);
        }
    }

    #[test]
    #[ignore]
    fn bench_sum() {
        let len = 4096;
        let input: Vec<f32> = (0..len).map(|x| x as f32).collect();
        let iters = 10_000;

        lanescan_bench::run_bench(10, format!("sum f32 x{}", len), || {
            for _ in 0..iters {
                std::hint::black_box(Sum::new(std::hint::black_box(&input)).dispatch());
            }
        });
    }

    #[test]
    fn test_sum_i32_wraps() {
        let input = vec![i32::MAX, 1];
        assert_eq!(Sum::new(&input).dispatch(), i32::MIN);
    }
}
