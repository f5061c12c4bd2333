use lanescan_simd::ops::{GetNumOps, MaskOps, NumOps};
use lanescan_simd::{Isa, SimdOp};

/// Finds the index of the first element in a slice equal to a target value.
///
/// This is equivalent to `slice.iter().position(|x| *x == target)` but faster,
/// as candidates are compared a group of SIMD vectors at a time. Each group is
/// tested for a match with a single any-lane check, and only a matching group
/// is re-examined to locate the lowest matching index.
pub struct FindFirst<'a, T> {
    input: &'a [T],
    target: T,
}

impl<'a, T> FindFirst<'a, T> {
    pub fn new(input: &'a [T], target: T) -> Self {
        FindFirst { input, target }
    }
}

/// Number of SIMD vectors compared per iteration of the main loop.
const UNROLL: usize = 4;

impl<T: GetNumOps + PartialEq> SimdOp for FindFirst<'_, T> {
    type Output = Option<usize>;

    #[inline(always)]
    fn eval<I: Isa>(self, isa: I) -> Self::Output {
        let ops = T::num_ops(isa);
        let mask_ops = ops.mask_ops();
        let v_len = ops.len();
        let target = ops.splat(self.target);

        let mut base = 0;
        let mut groups = self.input.chunks_exact(v_len * UNROLL);
        for group in groups.by_ref() {
            let xs = ops.load_many::<UNROLL>(group);
            let eq_masks = xs.map(|x| ops.eq(x, target));

            // OR the per-vector masks together so the no-match case, which
            // dominates, needs only one test per group.
            let any_01 = mask_ops.or(eq_masks[0], eq_masks[1]);
            let any_23 = mask_ops.or(eq_masks[2], eq_masks[3]);
            if mask_ops.any_true(mask_ops.or(any_01, any_23)) {
                // Re-examine the vectors in ascending order so the lowest
                // matching index wins, even if later vectors also match.
                for (i, eq_mask) in eq_masks.into_iter().enumerate() {
                    if let Some(lane) = mask_ops.first_true(eq_mask) {
                        return Some(base + i * v_len + lane);
                    }
                }
            }
            base += v_len * UNROLL;
        }

        let mut chunks = groups.remainder().chunks_exact(v_len);
        for chunk in chunks.by_ref() {
            let eq_mask = ops.eq(ops.load(chunk), target);
            if let Some(lane) = mask_ops.first_true(eq_mask) {
                return Some(base + lane);
            }
            base += v_len;
        }

        chunks
            .remainder()
            .iter()
            .position(|x| *x == self.target)
            .map(|i| base + i)
    }
}
