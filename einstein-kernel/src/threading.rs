//! Rayon-based parallel execution of planned contractions.
//!
//! The iteration space is split along one axis that the output indexes
//! (non-zero output stride), using recursive `rayon::join` bisection.
//! The output is a dense row-major buffer, so two points that differ in
//! such an axis always address different output elements: every output
//! element is accumulated by exactly one task, in the same order as the
//! serial walk.

use std::ops::Range;

use einstein_traits::Contraction;

use crate::kernel::for_each_offset;
use crate::maybe_sync::{MaybeSendSync, MaybeSync};

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to data is valid for the
/// lifetime of any parallel operation and that different threads write to
/// disjoint elements.
pub(crate) struct SendPtr<T>(pub(crate) *mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    pub(crate) fn as_ptr(self) -> *mut T {
        self.0
    }
}

/// Minimum number of iterations to justify multi-threaded execution.
pub(crate) const MINTHREADLENGTH: usize = 1 << 15;

/// Pick the axis to split: the largest axis with a non-zero output stride.
///
/// Returns `None` when the output is indexed by no axis (a full reduction),
/// in which case every point writes the same element and the walk must stay
/// serial.
pub(crate) fn split_axis(iter_dims: &[usize], strides_c: &[usize]) -> Option<usize> {
    iter_dims
        .iter()
        .enumerate()
        .filter(|&(p, &d)| d > 1 && strides_c[1 + p] != 0)
        .max_by_key(|&(p, &d)| (d, p))
        .map(|(p, _)| p)
}

/// Restrict `axis` to `range`: shrink its size and shift every base offset.
fn sub_plan(
    iter_dims: &[usize],
    strides: [&[usize]; 3],
    axis: usize,
    range: &Range<usize>,
) -> (Vec<usize>, [Vec<usize>; 3], usize) {
    let mut dims = iter_dims.to_vec();
    dims[axis] = range.len();
    let shifted = strides.map(|s| {
        let mut s = s.to_vec();
        s[0] += range.start * s[1 + axis];
        s
    });
    let n_iter = dims.iter().product();
    (dims, shifted, n_iter)
}

#[allow(clippy::too_many_arguments)]
fn run_range<F>(
    iter_dims: &[usize],
    strides: [&[usize]; 3],
    per_index: usize,
    axis: usize,
    range: Range<usize>,
    nthreads: usize,
    f: &F,
) where
    F: Fn(usize, usize, usize) + Sync,
{
    let work = per_index * range.len();
    if nthreads <= 1 || range.len() <= 1 || work <= MINTHREADLENGTH {
        let (dims, shifted, n_iter) = sub_plan(iter_dims, strides, axis, &range);
        let [sa, sb, sc] = &shifted;
        for_each_offset(&dims, [sa.as_slice(), sb.as_slice(), sc.as_slice()], n_iter, f);
        return;
    }

    let mid = range.start + range.len() / 2;
    let left_threads = nthreads / 2;
    rayon::join(
        || {
            run_range(
                iter_dims,
                strides,
                per_index,
                axis,
                range.start..mid,
                left_threads,
                f,
            )
        },
        || {
            run_range(
                iter_dims,
                strides,
                per_index,
                axis,
                mid..range.end,
                nthreads - left_threads,
                f,
            )
        },
    );
}

/// Parallel counterpart of the serial walk in [`crate::execute`].
///
/// The plan must already have passed [`crate::check_plan`] for these buffers
/// and `axis` must come from [`split_axis`].
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute_threaded<T, Op>(
    iter_dims: &[usize],
    strides: [&[usize]; 3],
    n_iter: usize,
    axis: usize,
    a: &[T],
    b: &[T],
    c: &mut [T],
    op: &Op,
) where
    T: Copy + MaybeSendSync,
    Op: Contraction<T> + MaybeSync,
{
    let c_send = SendPtr(c.as_mut_ptr());
    let per_index = n_iter / iter_dims[axis];
    let nthreads = rayon::current_num_threads();
    let f = |ia: usize, ib: usize, ic: usize| {
        // SAFETY: check_plan bounded every offset by the buffer lengths, and
        // tasks own disjoint index ranges of an axis that C is indexed by.
        let c_elem = unsafe { &mut *c_send.as_ptr().add(ic) };
        op.combine(a[ia], b[ib], c_elem);
    };
    run_range(iter_dims, strides, per_index, axis, 0..iter_dims[axis], nthreads, &f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use einstein_traits::AccumulateMul;

    #[test]
    fn test_split_axis_prefers_largest_output_axis() {
        // axis 0 only in inputs (stride 0 in C), axes 1 and 2 in C
        assert_eq!(split_axis(&[100, 8, 16], &[0, 0, 16, 1]), Some(2));
        assert_eq!(split_axis(&[100, 8, 16], &[0, 0, 1, 0]), Some(1));
    }

    #[test]
    fn test_split_axis_none_for_full_reduction() {
        assert_eq!(split_axis(&[64, 64], &[0, 0, 0]), None);
        assert_eq!(split_axis(&[1], &[0, 1]), None);
    }

    #[test]
    fn test_sub_plan_shifts_base() {
        let a: &[usize] = &[2, 10, 1];
        let b: &[usize] = &[0, 0, 1];
        let c: &[usize] = &[1, 1, 0];
        let (dims, shifted, n_iter) = sub_plan(&[8, 5], [a, b, c], 0, &(3..6));
        assert_eq!(dims, vec![3, 5]);
        assert_eq!(n_iter, 15);
        assert_eq!(shifted[0], vec![32, 10, 1]);
        assert_eq!(shifted[1], vec![0, 0, 1]);
        assert_eq!(shifted[2], vec![4, 1, 0]);
    }

    #[test]
    fn test_threaded_matches_serial() {
        // C_ij += A_ik * B_kj with i=j=256, k=4: n_iter = 262144 > MINTHREADLENGTH
        let (ni, nj, nk) = (256usize, 256usize, 4usize);
        let a: Vec<f64> = (0..ni * nk).map(|x| (x % 7) as f64).collect();
        let b: Vec<f64> = (0..nk * nj).map(|x| (x % 5) as f64 - 2.0).collect();
        // axis order [k, i, j]
        let sa = [0, 1, nk, 0];
        let sb = [0, nj, 0, 1];
        let sc = [0, 0, nj, 1];
        let dims = [nk, ni, nj];
        let n_iter = nk * ni * nj;

        let mut serial = vec![0.0; ni * nj];
        for_each_offset(&dims, [&sa[..], &sb[..], &sc[..]], n_iter, |ia, ib, ic| {
            serial[ic] += a[ia] * b[ib];
        });

        let mut par = vec![0.0; ni * nj];
        let axis = split_axis(&dims, &sc).unwrap();
        execute_threaded(
            &dims,
            [&sa[..], &sb[..], &sc[..]],
            n_iter,
            axis,
            &a,
            &b,
            &mut par,
            &AccumulateMul,
        );
        assert_eq!(serial, par);
    }
}
