//! Contraction planning: axis registry, iteration order and strides.

use std::collections::HashMap;

use einstein_kernel::{Contraction, MaybeSendSync, MaybeSync};
use einstein_view::ViewError;
use smallvec::SmallVec;

use crate::error::{EinsteinError, Operand, Result};
use crate::label::{AxisId, Label};

/// Stack-allocated Vec for per-axis metadata.
/// 8 elements covers the iteration spaces seen in practice.
type SVec<T> = SmallVec<[T; 8]>;

/// Distinct iteration axes and their sizes, in first-sighting order.
///
/// Filled by scanning A, B and C labels in that order; every later sighting
/// of an axis must agree with the size recorded first.
#[derive(Debug, Clone)]
pub struct AxisRegistry<ID: AxisId> {
    entries: Vec<(ID, usize)>,
    index: HashMap<ID, usize>,
}

impl<ID: AxisId> Default for AxisRegistry<ID> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<ID: AxisId> AxisRegistry<ID> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every `Axis` label of one array.
    pub fn observe(&mut self, operand: Operand, shape: &[usize], labels: &[Label<ID>]) -> Result<()> {
        for (&dim, label) in shape.iter().zip(labels.iter()) {
            let Label::Axis(id) = label else {
                continue;
            };
            match self.index.get(id) {
                Some(&slot) => {
                    let expected = self.entries[slot].1;
                    if expected != dim {
                        return Err(EinsteinError::AxisSizeMismatch {
                            axis: format!("{:?}", id),
                            operand,
                            expected,
                            found: dim,
                        });
                    }
                }
                None => {
                    self.index.insert(id.clone(), self.entries.len());
                    self.entries.push((id.clone(), dim));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_of(&self, id: &ID) -> Option<usize> {
        self.index.get(id).map(|&slot| self.entries[slot].1)
    }

    /// Axes ordered by ascending size; equal sizes keep first-sighting order.
    ///
    /// Larger axes end up last, which is where the executor's unrolled inner
    /// nest runs.
    pub fn into_iteration_order(self) -> Vec<(ID, usize)> {
        let mut entries = self.entries;
        entries.sort_by_key(|&(_, dim)| dim);
        entries
    }
}

/// Pre-computed iteration plan for a three-array contraction.
///
/// Every stride vector has `iter_dims().len() + 1` slots: slot 0 is the
/// array's base offset (the contribution of its fixed indices), slot `1 + p`
/// the step along iteration axis `p` (0 when the array does not use it).
#[derive(Debug, Clone, PartialEq)]
pub struct EinsteinPlan<ID: AxisId = i32> {
    axes: Vec<ID>,
    iter_dims: SVec<usize>,
    strides: [SVec<usize>; 3],
    shapes: [SVec<usize>; 3],
    n_iter: usize,
}

fn check_label_count<ID>(operand: Operand, shape: &[usize], labels: &[Label<ID>]) -> Result<()> {
    if shape.len() != labels.len() {
        return Err(EinsteinError::LabelCountMismatch {
            operand,
            labels: labels.len(),
            rank: shape.len(),
        });
    }
    Ok(())
}

fn check_fixed_indices<ID>(operand: Operand, shape: &[usize], labels: &[Label<ID>]) -> Result<()> {
    for (position, (&dim, label)) in shape.iter().zip(labels.iter()).enumerate() {
        if let Label::Fixed(index) = *label {
            if index >= dim {
                return Err(EinsteinError::FixedIndexOutOfRange {
                    operand,
                    position,
                    index,
                    dim,
                });
            }
        }
    }
    Ok(())
}

/// Row-major sweep of one array's own shape.
///
/// Fixed indices add to the base offset. An axis id used twice by the same
/// array gets the sum of both strides, so it walks the diagonal.
fn operand_strides<ID: AxisId>(
    shape: &[usize],
    labels: &[Label<ID>],
    positions: &HashMap<ID, usize>,
    n_axes: usize,
) -> Result<SVec<usize>> {
    let mut strides: SVec<usize> = SmallVec::from_elem(0, n_axes + 1);
    let mut cumprod = 1usize;
    for (&dim, label) in shape.iter().zip(labels.iter()).rev() {
        let next = cumprod
            .checked_mul(dim)
            .ok_or(EinsteinError::SizeOverflow("array strides"))?;
        match label {
            Label::Fixed(index) => strides[0] += index * cumprod,
            Label::Axis(id) => strides[1 + positions[id]] += cumprod,
        }
        cumprod = next;
    }
    Ok(strides)
}

impl<ID: AxisId> EinsteinPlan<ID> {
    /// Build a plan from the shapes and labels of A, B and C.
    ///
    /// Fails before computing any stride if a label vector does not match its
    /// shape, if C carries more labels than A and B together, if a fixed
    /// index is out of range, or if one axis id is used with two sizes.
    pub fn new(
        shape_a: &[usize],
        shape_b: &[usize],
        shape_c: &[usize],
        labels_a: &[Label<ID>],
        labels_b: &[Label<ID>],
        labels_c: &[Label<ID>],
    ) -> Result<Self> {
        let operands = [
            (Operand::A, shape_a, labels_a),
            (Operand::B, shape_b, labels_b),
            (Operand::C, shape_c, labels_c),
        ];

        for &(operand, shape, labels) in &operands {
            check_label_count(operand, shape, labels)?;
        }
        if labels_c.len() > labels_a.len() + labels_b.len() {
            return Err(EinsteinError::OutputRankTooLarge {
                output: labels_c.len(),
                inputs: labels_a.len() + labels_b.len(),
            });
        }
        for &(operand, shape, labels) in &operands {
            check_fixed_indices(operand, shape, labels)?;
        }

        let mut registry = AxisRegistry::new();
        for &(operand, shape, labels) in &operands {
            registry.observe(operand, shape, labels)?;
        }

        let ordered = registry.into_iteration_order();
        let positions: HashMap<ID, usize> = ordered
            .iter()
            .enumerate()
            .map(|(p, (id, _))| (id.clone(), p))
            .collect();
        let iter_dims: SVec<usize> = ordered.iter().map(|&(_, dim)| dim).collect();
        let n_iter = iter_dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(EinsteinError::SizeOverflow("iteration count"))?;

        let n_axes = iter_dims.len();
        let strides = [
            operand_strides(shape_a, labels_a, &positions, n_axes)?,
            operand_strides(shape_b, labels_b, &positions, n_axes)?,
            operand_strides(shape_c, labels_c, &positions, n_axes)?,
        ];

        let plan = EinsteinPlan {
            axes: ordered.into_iter().map(|(id, _)| id).collect(),
            iter_dims,
            strides,
            shapes: [
                SmallVec::from_slice(shape_a),
                SmallVec::from_slice(shape_b),
                SmallVec::from_slice(shape_c),
            ],
            n_iter,
        };
        log::debug!(
            "einstein plan: axes={:?} iter_dims={:?} n_iter={}",
            plan.axes,
            plan.iter_dims,
            plan.n_iter
        );
        Ok(plan)
    }

    /// Iteration axis ids, in iteration order.
    #[inline]
    pub fn axes(&self) -> &[ID] {
        &self.axes
    }

    #[inline]
    pub fn iter_dims(&self) -> &[usize] {
        &self.iter_dims
    }

    #[inline]
    pub fn strides_a(&self) -> &[usize] {
        &self.strides[0]
    }

    #[inline]
    pub fn strides_b(&self) -> &[usize] {
        &self.strides[1]
    }

    #[inline]
    pub fn strides_c(&self) -> &[usize] {
        &self.strides[2]
    }

    /// Total number of points in the iteration space.
    #[inline]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Position of an axis id in the iteration order.
    pub fn position(&self, id: &ID) -> Option<usize> {
        self.axes.iter().position(|x| x == id)
    }

    pub(crate) fn check_buffers(&self, lens: [usize; 3]) -> Result<()> {
        for (shape, &len) in self.shapes.iter().zip(lens.iter()) {
            let expected: usize = shape.iter().product();
            if expected != len {
                return Err(ViewError::ElementCountMismatch {
                    dims: shape.to_vec(),
                    expected,
                    actual: len,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Run the plan: `op.combine(a, b, &mut c)` at every iteration point.
    ///
    /// Buffers must hold exactly the element counts of the planned shapes.
    /// `c` is accumulated into, never cleared.
    pub fn execute<T, Op>(&self, a: &[T], b: &[T], c: &mut [T], op: &Op) -> Result<()>
    where
        T: Copy + MaybeSendSync,
        Op: Contraction<T> + MaybeSync,
    {
        self.check_buffers([a.len(), b.len(), c.len()])?;
        einstein_kernel::execute(
            &self.iter_dims,
            &self.strides[0],
            &self.strides[1],
            &self.strides[2],
            self.n_iter,
            a,
            b,
            c,
            op,
        )?;
        Ok(())
    }

    /// Visit the flat offsets `(a, b, c)` of every iteration point.
    pub fn for_each_offset<F>(&self, f: F)
    where
        F: FnMut(usize, usize, usize),
    {
        einstein_kernel::for_each_offset(
            &self.iter_dims,
            [&self.strides[0][..], &self.strides[1][..], &self.strides[2][..]],
            self.n_iter,
            f,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::label::labels_from_signed;

    fn plan(shapes: [&[usize]; 3], labels: [&[i32]; 3]) -> Result<EinsteinPlan<i32>> {
        EinsteinPlan::new(
            shapes[0],
            shapes[1],
            shapes[2],
            &labels_from_signed(labels[0]),
            &labels_from_signed(labels[1]),
            &labels_from_signed(labels[2]),
        )
    }

    #[test]
    fn test_matvec_plan() {
        let p = plan([&[2, 3], &[3], &[2]], [&[-1, -2], &[-2], &[-1]]).unwrap();
        assert_eq!(p.iter_dims(), &[2, 3]);
        assert_eq!(p.axes(), &[-1, -2]);
        assert_eq!(p.strides_a(), &[0, 3, 1]);
        assert_eq!(p.strides_b(), &[0, 0, 1]);
        assert_eq!(p.strides_c(), &[0, 1, 0]);
        assert_eq!(p.n_iter(), 6);
    }

    #[test]
    fn test_axes_sorted_by_size() {
        // axis -1 has size 5, -2 size 2, -3 size 3
        let p = plan([&[5, 2], &[2, 3], &[5, 3]], [&[-1, -2], &[-2, -3], &[-1, -3]]).unwrap();
        assert_eq!(p.axes(), &[-2, -3, -1]);
        assert_eq!(p.iter_dims(), &[2, 3, 5]);
        // A [5,2]: -1 stride 2, -2 stride 1
        assert_eq!(p.strides_a(), &[0, 1, 0, 2]);
        // B [2,3]: -2 stride 3, -3 stride 1
        assert_eq!(p.strides_b(), &[0, 3, 1, 0]);
        // C [5,3]: -1 stride 3, -3 stride 1
        assert_eq!(p.strides_c(), &[0, 0, 1, 3]);
        assert_eq!(p.position(&-1), Some(2));
        assert_eq!(p.position(&-9), None);
    }

    #[test]
    fn test_ties_keep_first_sighting_order() {
        let p = plan([&[4], &[4], &[4, 4]], [&[-3], &[-1], &[-3, -1]]).unwrap();
        assert_eq!(p.axes(), &[-3, -1]);
        let p = plan([&[4], &[4], &[4, 4]], [&[-1], &[-3], &[-3, -1]]).unwrap();
        assert_eq!(p.axes(), &[-1, -3]);
    }

    #[test]
    fn test_fixed_index_base_offset() {
        let p = plan([&[2, 3], &[3], &[3]], [&[1, -1], &[-1], &[-1]]).unwrap();
        assert_eq!(p.strides_a(), &[3, 1]);
        assert_eq!(p.n_iter(), 3);

        // fixed indices on several axes accumulate
        let p = plan([&[2, 3, 4], &[4], &[4]], [&[1, 2, -1], &[-1], &[-1]]).unwrap();
        assert_eq!(p.strides_a()[0], 12 + 2 * 4);
    }

    #[test]
    fn test_repeated_label_in_one_array_walks_diagonal() {
        let p = plan([&[3, 3], &[], &[]], [&[-1, -1], &[], &[]]).unwrap();
        assert_eq!(p.iter_dims(), &[3]);
        assert_eq!(p.strides_a(), &[0, 4]);
        assert_eq!(p.n_iter(), 3);
    }

    #[test]
    fn test_axis_only_in_output() {
        // c[i] += a[0] * b[0] broadcasts one product over i
        let p = plan([&[1], &[1], &[4]], [&[0], &[0], &[-1]]).unwrap();
        assert_eq!(p.iter_dims(), &[4]);
        assert_eq!(p.strides_a(), &[0, 0]);
        assert_eq!(p.strides_b(), &[0, 0]);
        assert_eq!(p.strides_c(), &[0, 1]);
        assert_eq!(p.n_iter(), 4);

        // rank-0 inputs carry no labels, so C may not carry any either
        let err = plan([&[], &[], &[4]], [&[], &[], &[-1]]).unwrap_err();
        assert_eq!(
            err,
            EinsteinError::OutputRankTooLarge {
                output: 1,
                inputs: 0
            }
        );
    }

    #[test]
    fn test_no_axes() {
        let p = plan([&[2], &[3], &[]], [&[1], &[2], &[]]).unwrap();
        assert!(p.iter_dims().is_empty());
        assert_eq!(p.n_iter(), 1);
        assert_eq!(p.strides_a(), &[1]);
        assert_eq!(p.strides_b(), &[2]);
        assert_eq!(p.strides_c(), &[0]);
    }

    #[test]
    fn test_zero_size_axis() {
        let p = plan([&[0, 3], &[3], &[0]], [&[-1, -2], &[-2], &[-1]]).unwrap();
        assert_eq!(p.n_iter(), 0);
        assert_eq!(p.iter_dims(), &[0, 3]);
    }

    #[test]
    fn test_error_label_count() {
        let err = plan([&[2, 3], &[3], &[2]], [&[-1], &[-2], &[-1]]).unwrap_err();
        assert_eq!(
            err,
            EinsteinError::LabelCountMismatch {
                operand: Operand::A,
                labels: 1,
                rank: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        let err = plan([&[2], &[3], &[2]], [&[-1], &[-2], &[-1, -2]]).unwrap_err();
        assert!(matches!(
            err,
            EinsteinError::LabelCountMismatch {
                operand: Operand::C,
                ..
            }
        ));
    }

    #[test]
    fn test_error_output_rank() {
        let err = plan([&[2], &[2], &[2, 2, 1]], [&[-1], &[-2], &[-1, -2, 0]]).unwrap_err();
        assert_eq!(
            err,
            EinsteinError::OutputRankTooLarge {
                output: 3,
                inputs: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::AxisConsistency);
    }

    #[test]
    fn test_error_fixed_index_out_of_range() {
        let err = plan([&[2, 3], &[3], &[3]], [&[2, -1], &[-1], &[-1]]).unwrap_err();
        assert_eq!(
            err,
            EinsteinError::FixedIndexOutOfRange {
                operand: Operand::A,
                position: 0,
                index: 2,
                dim: 2
            }
        );
    }

    #[test]
    fn test_error_axis_size_mismatch_every_pair() {
        // A/B
        let err = plan([&[2], &[3], &[]], [&[-1], &[-1], &[]]).unwrap_err();
        assert!(matches!(
            err,
            EinsteinError::AxisSizeMismatch {
                operand: Operand::B,
                expected: 2,
                found: 3,
                ..
            }
        ));
        // A/C
        let err = plan([&[2], &[], &[3]], [&[-1], &[], &[-1]]).unwrap_err();
        assert!(matches!(
            err,
            EinsteinError::AxisSizeMismatch {
                operand: Operand::C,
                ..
            }
        ));
        // B/C
        let err = plan([&[], &[4], &[5]], [&[], &[-7], &[-7]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AxisConsistency);
        // within one array
        let err = plan([&[2, 3], &[], &[]], [&[-1, -1], &[], &[]]).unwrap_err();
        assert!(matches!(
            err,
            EinsteinError::AxisSizeMismatch {
                operand: Operand::A,
                ..
            }
        ));
    }

    #[test]
    fn test_registry() {
        let mut reg: AxisRegistry<char> = AxisRegistry::new();
        assert!(reg.is_empty());
        reg.observe(Operand::A, &[3, 2], &[Label::Axis('i'), Label::Fixed(0)])
            .unwrap();
        reg.observe(Operand::B, &[3, 1], &[Label::Axis('i'), Label::Axis('j')])
            .unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.size_of(&'i'), Some(3));
        assert_eq!(reg.size_of(&'k'), None);
        assert_eq!(reg.into_iteration_order(), vec![('j', 1), ('i', 3)]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let shapes: [&[usize]; 3] = [&[3, 4, 3], &[4, 2], &[3, 2]];
        let labels: [&[i32]; 3] = [&[-1, -2, -3], &[-2, -4], &[-3, -4]];
        let p1 = plan(shapes, labels).unwrap();
        let p2 = plan(shapes, labels).unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_execute_checks_buffer_lengths() {
        let p = plan([&[2, 3], &[3], &[2]], [&[-1, -2], &[-2], &[-1]]).unwrap();
        let a = [1.0; 5];
        let b = [1.0; 3];
        let mut c = [0.0; 2];
        let err = p
            .execute(&a, &b, &mut c, &einstein_kernel::AccumulateMul)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }
}
