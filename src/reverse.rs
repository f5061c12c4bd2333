use lanescan_simd::ops::{GetNumOps, NumOps};
use lanescan_simd::{Isa, SimdOp};

/// Reverses the order of elements in a slice, in place.
///
/// Elements are swapped a SIMD vector at a time, working inwards from both
/// ends of the slice with each vector's lanes reversed as it crosses over.
pub struct Reverse<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> Reverse<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        Reverse { data }
    }
}

impl<T: GetNumOps> SimdOp for Reverse<'_, T> {
    type Output = ();

    #[inline(always)]
    fn eval<I: Isa>(self, isa: I) {
        let ops = T::num_ops(isa);
        let v_len = ops.len();

        let mut lo = 0;
        let mut hi = self.data.len();
        while hi - lo >= v_len * 2 {
            let front = ops.load(&self.data[lo..]);
            let back = ops.load(&self.data[hi - v_len..]);

            ops.store(ops.reverse(back), &mut self.data[lo..]);
            ops.store(ops.reverse(front), &mut self.data[hi - v_len..]);

            lo += v_len;
            hi -= v_len;
        }

        // Middle section shorter than two vectors.
        self.data[lo..hi].reverse();
    }
}

#[cfg(test)]
mod tests {
    use lanescan_simd::SimdOp;

    use super::Reverse;

    #[test]
    fn test_reverse_i32() {
        // Cover the empty slice, middle sections of various sizes and lengths
        // which need several vectorized steps.
        for len in [0usize, 1, 2, 7, 16, 31, 64, 100] {
            let mut data: Vec<i32> = (0..len as i32).collect();
            let mut expected = data.clone();
            expected.reverse();

            Reverse::new(&mut data).dispatch();
            assert_eq!(data, expected, "len {}", len);
        }
    }

    #[test]
    #[ignore]
    fn bench_reverse() {
        let len = 4096;
        let mut data: Vec<i32> = (0..len).collect();
        let iters = 10_000;

        lanescan_bench::run_bench(10, format!("reverse i32 x{}", len), || {
            for _ in 0..iters {
                Reverse::new(std::hint::black_box(&mut data)).dispatch();
            }
        });
    }

    #[test]
    fn test_reverse_f32() {
        for len in [0usize, 5, 18, 73] {
            let mut data: Vec<f32> = (0..len).map(|x| x as f32).collect();
            let mut expected = data.clone();
            expected.reverse();

            Reverse::new(&mut data).dispatch();
            assert_eq!(data, expected, "len {}", len);
        }
    }
}
