//! Generic Einstein-summation contraction over dense, flat-stored arrays.
//!
//! One planner and one executor replace the usual zoo of special-cased
//! tensor kernels (matrix multiply, outer product, trace, batched
//! contraction, sparsity propagation). Each axis of each of the three arrays
//! carries a [`Label`]:
//! - [`Label::Fixed`]`(i)` pins the axis to index `i`
//! - [`Label::Axis`]`(id)` iterates it; axes sharing an `id` move together
//!
//! [`EinsteinPlan::new`] validates the labels against the shapes and turns
//! them into one iteration space with per-array strides; execution then runs
//! `c += a * b` (or any other [`Contraction`]) at every point. Axes that are
//! absent from C are summed, axes present in C are free.
//!
//! # Example
//!
//! ```
//! use strided_einstein::{einstein_into, labels_from_signed, DenseArray};
//!
//! // C_i = sum_j A_ij * B_j
//! let a = DenseArray::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! let b = DenseArray::<f64>::from_vec(vec![1.0, 1.0, 1.0], &[3]).unwrap();
//! let mut c = DenseArray::<f64>::zeros(&[2]);
//!
//! einstein_into(
//!     c.view_mut(), &a.view(), &b.view(),
//!     &labels_from_signed(&[-1]),
//!     &labels_from_signed(&[-1, -2]),
//!     &labels_from_signed(&[-2]),
//! ).unwrap();
//! assert_eq!(c.data(), &[6.0, 15.0]);
//! ```
//!
//! # Features
//!
//! - `parallel`: split large iteration spaces across the rayon thread pool.

/// Error types and the [`ErrorKind`] classification.
pub mod error;
/// Axis labels and the signed-integer label convention.
pub mod label;
/// Contraction planning: axis registry, iteration order, strides.
pub mod plan;
/// Forward and reverse dependency-bit propagation.
pub mod sparsity;

pub use einstein_kernel::{Contraction, MaybeSendSync, MaybeSync};
pub use einstein_traits::{from_fn, AccumulateMul, AccumulateOr, BitMask, ContractElement, FromFn};
pub use einstein_view::{DenseArray, DenseView, DenseViewMut, ViewError};

pub use error::{EinsteinError, ErrorKind, Operand, Result};
pub use label::{labels_from_signed, AxisId, Label};
pub use plan::{AxisRegistry, EinsteinPlan};

/// Einstein contraction with the element type's default operation.
///
/// `ic`, `ia`, `ib` are the labels of C, A, B respectively. For numeric
/// element types this computes `C += contract(A, B)`; for [`BitMask`] it
/// computes `C |= contract(A, B)`. C is accumulated into, so zero it first
/// for a plain result.
pub fn einstein_into<T, ID>(
    c: DenseViewMut<'_, T>,
    a: &DenseView<'_, T>,
    b: &DenseView<'_, T>,
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

/// Einstein contraction with an explicit [`Contraction`] operation.
///
/// ```
/// use strided_einstein::{einstein_with_into, from_fn, DenseArray, Label};
///
/// // max-plus matrix-vector product: c_i = max_j (a_ij + b_j)
/// let a = DenseArray::from_vec(vec![0.0, 5.0, 1.0, 2.0], &[2, 2]).unwrap();
/// let b = DenseArray::from_vec(vec![1.0, 0.0], &[2]).unwrap();
/// let mut c = DenseArray::from_vec(vec![f64::NEG_INFINITY; 2], &[2]).unwrap();
/// let op = from_fn(|x: f64, y: f64, z: &mut f64| *z = z.max(x + y));
///
/// einstein_with_into(
///     c.view_mut(), &a.view(), &b.view(),
///     &[Label::Axis('i')],
///     &[Label::Axis('i'), Label::Axis('j')],
///     &[Label::Axis('j')],
///     &op,
/// ).unwrap();
/// assert_eq!(c.data(), &[5.0, 2.0]);
/// ```
pub fn einstein_with_into<T, ID, Op>(
    c: DenseViewMut<'_, T>,
    a: &DenseView<'_, T>,
    b: &DenseView<'_, T>,
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
    let plan = EinsteinPlan::new(a.dims(), b.dims(), c.dims(), ia, ib, ic)?;
    plan.execute(a.data(), b.data(), c.into_data(), op)
}
