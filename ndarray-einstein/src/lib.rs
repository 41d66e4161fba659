//! Einstein contraction for `ndarray` arrays.
//!
//! A thin wrapper over [`strided_einstein`] that accepts `ArrayViewD` and
//! `ArrayViewMutD` directly. Arrays must be in standard (C-contiguous)
//! layout; the data is borrowed, never copied.
//!
//! # Example
//!
//! ```
//! use ndarray::ArrayD;
//! use ndarray_einstein::einstein;
//! use strided_einstein::labels_from_signed;
//!
//! let a = ArrayD::from_shape_vec(vec![2, 3], (1..=6).map(|x| x as f64).collect()).unwrap();
//! let b = ArrayD::from_shape_vec(vec![3, 2], (7..=12).map(|x| x as f64).collect()).unwrap();
//! let c = einstein(
//!     &[2, 2],
//!     &a.view(),
//!     &b.view(),
//!     &labels_from_signed(&[-1, -3]),
//!     &labels_from_signed(&[-1, -2]),
//!     &labels_from_signed(&[-2, -3]),
//! )
//! .unwrap();
//! assert_eq!(c[[0, 0]], 58.0);
//! ```

pub mod convert;

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD};
use num_traits::Zero;
use strided_einstein::{
    AxisId, Contraction, ContractElement, EinsteinError, Label, MaybeSendSync, MaybeSync, Operand,
    ViewError,
};

use crate::convert::{view_mut_to_dense, view_to_dense};

/// Error type for ndarray-einstein operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Einstein(#[from] EinsteinError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("operand {operand} is not in standard (C-contiguous) layout")]
    NonContiguous { operand: Operand },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Contract `a` and `b` into `c` with the element type's default operation.
///
/// `c` is accumulated into, not overwritten.
pub fn einstein_into<T, ID>(
    c: &mut ArrayViewMutD<'_, T>,
    a: &ArrayViewD<'_, T>,
    b: &ArrayViewD<'_, T>,
    ic: &[Label<ID>],
    ia: &[Label<ID>],
    ib: &[Label<ID>],
) -> Result<()>
where
    T: ContractElement + MaybeSendSync,
    T::DefaultOp: MaybeSync,
    ID: AxisId,
{
    einstein_with_into(c, a, b, ic, ia, ib, &<T::DefaultOp as Default>::default())
}

/// Contract `a` and `b` into `c` with an explicit operation.
pub fn einstein_with_into<T, ID, Op>(
    c: &mut ArrayViewMutD<'_, T>,
    a: &ArrayViewD<'_, T>,
    b: &ArrayViewD<'_, T>,
    ic: &[Label<ID>],
    ia: &[Label<ID>],
    ib: &[Label<ID>],
    op: &Op,
) -> Result<()>
where
    T: Copy + MaybeSendSync,
    ID: AxisId,
    Op: Contraction<T> + MaybeSync,
{
    let a = view_to_dense(a, Operand::A)?;
    let b = view_to_dense(b, Operand::B)?;
    let c = view_mut_to_dense(c, Operand::C)?;
    strided_einstein::einstein_with_into(c, &a, &b, ic, ia, ib, op)?;
    Ok(())
}

/// Allocate a zeroed output of shape `shape_c` and contract into it.
pub fn einstein<T, ID>(
    shape_c: &[usize],
    a: &ArrayViewD<'_, T>,
    b: &ArrayViewD<'_, T>,
    ic: &[Label<ID>],
    ia: &[Label<ID>],
    ib: &[Label<ID>],
) -> Result<ArrayD<T>>
where
    T: ContractElement + MaybeSendSync + Zero,
    T::DefaultOp: MaybeSync,
    ID: AxisId,
{
    let mut c = ArrayD::<T>::zeros(shape_c);
    einstein_into(&mut c.view_mut(), a, b, ic, ia, ib)?;
    Ok(c)
}
