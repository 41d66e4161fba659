use ndarray::{ArrayViewD, ArrayViewMutD};
use strided_einstein::{DenseView, DenseViewMut, Operand};

use crate::{Error, Result};

/// Borrow a standard-layout `ArrayViewD` as a `DenseView` (zero-copy).
///
/// Arrays that are not C-contiguous (transposed, sliced with a step, ...)
/// are rejected rather than copied.
pub fn view_to_dense<'v, T>(view: &'v ArrayViewD<'_, T>, operand: Operand) -> Result<DenseView<'v, T>> {
    let data = view.as_slice().ok_or(Error::NonContiguous { operand })?;
    Ok(DenseView::new(data, view.shape())?)
}

/// Borrow a standard-layout `ArrayViewMutD` as a `DenseViewMut` (zero-copy).
pub fn view_mut_to_dense<'v, T>(
    view: &'v mut ArrayViewMutD<'_, T>,
    operand: Operand,
) -> Result<DenseViewMut<'v, T>> {
    let shape = view.shape().to_vec();
    let data = view
        .as_slice_mut()
        .ok_or(Error::NonContiguous { operand })?;
    Ok(DenseViewMut::new(data, &shape)?)
}
