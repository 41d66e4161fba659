//! Loop-nest executor for planned Einstein contractions.
//!
//! A plan is a list of iteration-axis sizes plus, for each of the three
//! arrays, a stride vector whose slot 0 is a base offset and whose slots
//! `1..=n` are the per-axis strides (0 where the array does not use the axis).
//! [`execute`] walks every point of that iteration space and hands the
//! addressed element triple to a [`Contraction`].
//!
//! The walk is a fixed 3-level nest over the last (largest) three axes,
//! wrapped in a mixed-radix loop over any remaining axes. Rank never changes
//! the code path.
//!
//! # Example
//!
//! ```
//! use einstein_kernel::execute;
//! use einstein_traits::AccumulateMul;
//!
//! // C_i += A_ij * B_j with A = [[1,2,3],[4,5,6]], B = [1,1,1]
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let b = [1.0, 1.0, 1.0];
//! let mut c = [0.0; 2];
//! // axes: i (size 2), j (size 3)
//! execute(
//!     &[2, 3],
//!     &[0, 3, 1],
//!     &[0, 0, 1],
//!     &[0, 1, 0],
//!     6,
//!     &a, &b, &mut c,
//!     &AccumulateMul,
//! ).unwrap();
//! assert_eq!(c, [6.0, 15.0]);
//! ```

pub mod execute;
pub mod kernel;
pub mod maybe_sync;
#[cfg(feature = "parallel")]
pub(crate) mod threading;

pub use einstein_traits::{AccumulateMul, AccumulateOr, Contraction};
pub use einstein_view::{Result, ViewError};
pub use execute::{check_plan, execute};
pub use kernel::for_each_offset;
pub use maybe_sync::{MaybeSendSync, MaybeSync};
