//! Dependency bit-pattern propagation through a planned contraction.
//!
//! The same plan that contracts numeric values can tell which inputs an
//! output depends on: element bits record "influenced by" sets, and every
//! iteration point links one element of A and one of B to one element of C.
//! Forward propagation pushes input bits into the output; reverse
//! propagation pushes output seeds back to the inputs. Bits are only ever
//! set, never cleared.

use std::ops::BitOr;

use einstein_kernel::{AccumulateOr, MaybeSendSync};

use crate::error::Result;
use crate::label::AxisId;
use crate::plan::EinsteinPlan;

/// `c |= a | b` at every iteration point.
pub fn propagate_forward<T, ID>(plan: &EinsteinPlan<ID>, a: &[T], b: &[T], c: &mut [T]) -> Result<()>
where
    T: Copy + BitOr<Output = T> + MaybeSendSync,
    ID: AxisId,
{
    plan.execute(a, b, c, &AccumulateOr)
}

/// `a_seed |= c_seed` and `b_seed |= c_seed` at every iteration point.
///
/// Runs serially: several points write the same input element whenever the
/// input does not use every iteration axis.
pub fn propagate_reverse<T, ID>(
    plan: &EinsteinPlan<ID>,
    a_seed: &mut [T],
    b_seed: &mut [T],
    c_seed: &[T],
) -> Result<()>
where
    T: Copy + BitOr<Output = T>,
    ID: AxisId,
{
    plan.check_buffers([a_seed.len(), b_seed.len(), c_seed.len()])?;
    plan.for_each_offset(|ia, ib, ic| {
        let seed = c_seed[ic];
        a_seed[ia] = a_seed[ia] | seed;
        b_seed[ib] = b_seed[ib] | seed;
    });
    Ok(())
}
