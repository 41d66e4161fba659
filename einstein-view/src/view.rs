//! Dense row-major views over borrowed buffers.

use std::sync::Arc;

use num_traits::Zero;

use crate::{Result, ViewError};

// ============================================================================
// Validation helpers
// ============================================================================

fn check_element_count(len: usize, dims: &[usize]) -> Result<()> {
    let expected = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(ViewError::OffsetOverflow { len })?;
    if expected != len {
        return Err(ViewError::ElementCountMismatch {
            dims: dims.to_vec(),
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Validate that every offset `offset + sum(i_k * strides[k])`, with
/// `i_k < dims[k]`, stays within `[0, len)`.
///
/// A zero-size dimension means nothing is ever accessed, which always passes.
pub fn validate_reach(len: usize, dims: &[usize], strides: &[usize], offset: usize) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(ViewError::StrideLengthMismatch);
    }
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim - 1)
                .ok_or(ViewError::OffsetOverflow { len })?;
            max_offset = max_offset
                .checked_add(end)
                .ok_or(ViewError::OffsetOverflow { len })?;
        }
    }
    if max_offset >= len {
        return Err(ViewError::OffsetOverflow { len });
    }
    Ok(())
}

/// Compute row-major strides (C default: last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Flat offset of a multi-index in a row-major buffer of shape `dims`.
///
/// Panics if the index rank is wrong or any index is out of bounds.
pub fn row_major_offset(dims: &[usize], indices: &[usize]) -> usize {
    assert_eq!(indices.len(), dims.len(), "wrong number of indices");
    let mut offset = 0usize;
    for (&index, &dim) in indices.iter().zip(dims.iter()) {
        assert!(index < dim, "index {} out of bounds for dim {}", index, dim);
        offset = offset * dim + index;
    }
    offset
}

// ============================================================================
// DenseView
// ============================================================================

/// Immutable view of a dense row-major buffer.
pub struct DenseView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
}

impl<T> Clone for DenseView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DenseView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseView")
            .field("dims", &self.dims)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T> DenseView<'a, T> {
    /// Wrap `data` as an array of shape `dims`.
    pub fn new(data: &'a [T], dims: &[usize]) -> Result<Self> {
        check_element_count(data.len(), dims)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
        })
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Copy> DenseView<'_, T> {
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[row_major_offset(&self.dims, indices)]
    }
}

// ============================================================================
// DenseViewMut
// ============================================================================

/// Mutable view of a dense row-major buffer.
pub struct DenseViewMut<'a, T> {
    data: &'a mut [T],
    dims: Arc<[usize]>,
}

impl<T> std::fmt::Debug for DenseViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseViewMut")
            .field("dims", &self.dims)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T> DenseViewMut<'a, T> {
    pub fn new(data: &'a mut [T], dims: &[usize]) -> Result<Self> {
        check_element_count(data.len(), dims)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
        })
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &*self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Consume the view, keeping the mutable borrow of the buffer.
    #[inline]
    pub fn into_data(self) -> &'a mut [T] {
        self.data
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> DenseView<'_, T> {
        DenseView {
            data: &*self.data,
            dims: self.dims.clone(),
        }
    }
}

impl<T: Copy> DenseViewMut<'_, T> {
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[row_major_offset(&self.dims, indices)]
    }
}

// ============================================================================
// DenseArray
// ============================================================================

/// Owned dense row-major array.
#[derive(Clone, PartialEq)]
pub struct DenseArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for DenseArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseArray")
            .field("dims", &self.dims)
            .field("data", &self.data)
            .finish()
    }
}

impl<T> DenseArray<T> {
    /// Take ownership of `data` as an array of shape `dims`.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        check_element_count(data.len(), dims)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
        })
    }

    /// Create a tensor with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn_row_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let rank = dims.len();
        let mut data = Vec::with_capacity(total);
        let mut idx = vec![0usize; rank];
        for _ in 0..total {
            data.push(f(&idx));
            for d in (0..rank).rev() {
                idx[d] += 1;
                if idx[d] < dims[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
        Self {
            data,
            dims: Arc::from(dims),
        }
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn view(&self) -> DenseView<'_, T> {
        DenseView {
            data: &self.data,
            dims: self.dims.clone(),
        }
    }

    pub fn view_mut(&mut self) -> DenseViewMut<'_, T> {
        DenseViewMut {
            data: &mut self.data,
            dims: self.dims.clone(),
        }
    }
}

impl<T: Zero + Clone> DenseArray<T> {
    /// Zero-filled array, the usual starting point for a summed output.
    pub fn zeros(dims: &[usize]) -> Self {
        let total: usize = dims.iter().product();
        Self {
            data: vec![T::zero(); total],
            dims: Arc::from(dims),
        }
    }
}

impl<T: Copy> DenseArray<T> {
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[row_major_offset(&self.dims, indices)]
    }
}
