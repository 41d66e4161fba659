//! Dense, flat-stored array views for Einstein contractions.
//!
//! Every array handed to the contraction engine is a contiguous buffer in
//! row-major (C) order paired with its shape. The views here only check that
//! the two agree; they never copy or own caller data.
//!
//! # Example
//!
//! ```
//! use einstein_view::{DenseArray, DenseView};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let view = DenseView::new(&data, &[2, 3]).unwrap();
//! assert_eq!(view.get(&[1, 2]), 6.0);
//!
//! // Shape and buffer length must agree.
//! assert!(DenseView::new(&data, &[4, 2]).is_err());
//!
//! let arr = DenseArray::<f64>::from_fn_row_major(&[2, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
//! assert_eq!(arr.data(), &[0.0, 1.0, 2.0, 3.0]);
//! ```

pub mod view;

pub use view::{
    row_major_offset, row_major_strides, validate_reach, DenseArray, DenseView, DenseViewMut,
};

/// Errors that can occur when building views or checking buffer reach.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Buffer length does not equal the product of the shape.
    #[error("element count mismatch: shape {dims:?} needs {expected} elements, buffer has {actual}")]
    ElementCountMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Iteration count disagrees with the product of the iteration dims.
    #[error("iteration count mismatch: dims give {expected}, got {actual}")]
    IterationCountMismatch { expected: usize, actual: usize },

    /// The product of the iteration dims does not fit in `usize`.
    #[error("iteration space overflows usize: dims {dims:?}")]
    IterationOverflow { dims: Vec<usize> },

    /// An index combination would reach past the end of the buffer.
    #[error("offset overflow: reachable offset exceeds buffer of length {len}")]
    OffsetOverflow { len: usize },
}

/// Convenience alias for `Result<T, ViewError>`.
pub type Result<T> = std::result::Result<T, ViewError>;
