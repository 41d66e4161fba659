//! Contraction execution over borrowed buffers.

use einstein_traits::Contraction;
use einstein_view::{validate_reach, Result, ViewError};

use crate::kernel::for_each_offset;
use crate::maybe_sync::{MaybeSendSync, MaybeSync};

/// Check that a plan is well formed for buffers of the given lengths.
///
/// Every stride vector must have `iter_dims.len() + 1` slots, `n_iter` must
/// equal the product of `iter_dims`, and every offset the plan can produce
/// must fall inside its buffer. The cost is linear in the number of axes.
pub fn check_plan(
    iter_dims: &[usize],
    strides: [&[usize]; 3],
    n_iter: usize,
    lens: [usize; 3],
) -> Result<()> {
    let expected = iter_dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| ViewError::IterationOverflow {
            dims: iter_dims.to_vec(),
        })?;
    if expected != n_iter {
        return Err(ViewError::IterationCountMismatch {
            expected,
            actual: n_iter,
        });
    }
    for (s, &len) in strides.iter().zip(lens.iter()) {
        let (base, axis_strides) = s.split_first().ok_or(ViewError::StrideLengthMismatch)?;
        validate_reach(len, iter_dims, axis_strides, *base)?;
    }
    Ok(())
}

/// Execute a planned contraction: `op.combine(a, b, &mut c)` at every point.
///
/// `strides_a`, `strides_b`, `strides_c` each carry the base offset in slot 0
/// followed by one stride per entry of `iter_dims`. The output is accumulated
/// into, never cleared; zero it first for plain summation.
///
/// With the `parallel` feature, large iteration spaces are split along an
/// axis the output actually indexes, so each output element is only ever
/// touched by one thread.
#[allow(clippy::too_many_arguments)]
pub fn execute<T, Op>(
    iter_dims: &[usize],
    strides_a: &[usize],
    strides_b: &[usize],
    strides_c: &[usize],
    n_iter: usize,
    a: &[T],
    b: &[T],
    c: &mut [T],
    op: &Op,
) -> Result<()>
where
    T: Copy + MaybeSendSync,
    Op: Contraction<T> + MaybeSync,
{
    let strides = [strides_a, strides_b, strides_c];
    check_plan(iter_dims, strides, n_iter, [a.len(), b.len(), c.len()])?;
    if n_iter == 0 {
        return Ok(());
    }

    #[cfg(feature = "parallel")]
    {
        if n_iter > crate::threading::MINTHREADLENGTH {
            if let Some(axis) = crate::threading::split_axis(iter_dims, strides_c) {
                log::trace!(
                    "einstein execute: parallel over axis {} (size {}), n_iter={}",
                    axis,
                    iter_dims[axis],
                    n_iter
                );
                crate::threading::execute_threaded(iter_dims, strides, n_iter, axis, a, b, c, op);
                return Ok(());
            }
        }
    }

    log::trace!(
        "einstein execute: serial, iter_dims={:?}, n_iter={}",
        iter_dims,
        n_iter
    );
    for_each_offset(iter_dims, strides, n_iter, |ia, ib, ic| {
        op.combine(a[ia], b[ib], &mut c[ic]);
    });
    Ok(())
}
