//! Iteration engine: a fixed 3-level nest inside a mixed-radix outer loop.
//!
//! The last three iteration axes run as explicit nested loops with no
//! per-point division. Every axis in front of them is folded into a single
//! outer counter that is decoded with `%` and `/` once per outer iteration.

/// Number of axes handled by the explicit inner nest.
pub(crate) const INNER_LEVELS: usize = 3;

/// Inner-nest sizes and per-array steps, padded with size 1 / step 0 in
/// front when the plan has fewer than three axes.
struct InnerNest {
    dims: [usize; INNER_LEVELS],
    steps: [[usize; 3]; INNER_LEVELS],
}

impl InnerNest {
    fn new(iter_dims: &[usize], strides: [&[usize]; 3]) -> Self {
        let n = iter_dims.len();
        let inner = n.min(INNER_LEVELS);
        let mut dims = [1usize; INNER_LEVELS];
        let mut steps = [[0usize; 3]; INNER_LEVELS];
        for level in 0..inner {
            let axis = n - inner + level;
            let slot = INNER_LEVELS - inner + level;
            dims[slot] = iter_dims[axis];
            for (k, s) in strides.iter().enumerate() {
                steps[slot][k] = s[1 + axis];
            }
        }
        Self { dims, steps }
    }

    #[inline]
    fn volume(&self) -> usize {
        self.dims.iter().product()
    }
}

#[inline(always)]
fn advance(offsets: &mut [usize; 3], step: &[usize; 3]) {
    offsets[0] += step[0];
    offsets[1] += step[1];
    offsets[2] += step[2];
}

/// Visit every point of a planned iteration space.
///
/// `strides` holds the stride vectors of A, B and C in that order, each of
/// length `iter_dims.len() + 1` with the base offset in slot 0. `f` receives
/// the flat offsets `(a, b, c)` of each point. Points are visited with the
/// last axis varying fastest.
///
/// The plan is not validated here; see [`crate::check_plan`].
pub fn for_each_offset<F>(iter_dims: &[usize], strides: [&[usize]; 3], n_iter: usize, mut f: F)
where
    F: FnMut(usize, usize, usize),
{
    if n_iter == 0 {
        return;
    }

    let n = iter_dims.len();
    let nest = InnerNest::new(iter_dims, strides);
    let n_outer_axes = n.saturating_sub(INNER_LEVELS);
    let n_outer = n_iter / nest.volume();
    let base = [strides[0][0], strides[1][0], strides[2][0]];
    let [d1, d2, d3] = nest.dims;
    let [s1, s2, s3] = nest.steps;

    for i in 0..n_outer {
        // Decode the outer counter; the first outer axis varies fastest.
        let mut start = base;
        let mut sub = i;
        for j in 0..n_outer_axes {
            let dim = iter_dims[j];
            let ind = sub % dim;
            start[0] += strides[0][1 + j] * ind;
            start[1] += strides[1][1 + j] * ind;
            start[2] += strides[2][1 + j] * ind;
            sub /= dim;
        }

        let mut o1 = start;
        for _ in 0..d1 {
            let mut o2 = o1;
            for _ in 0..d2 {
                let mut o3 = o2;
                for _ in 0..d3 {
                    f(o3[0], o3[1], o3[2]);
                    advance(&mut o3, &s3);
                }
                advance(&mut o2, &s2);
            }
            advance(&mut o1, &s1);
        }
    }
}
