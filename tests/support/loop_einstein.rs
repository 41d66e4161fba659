//! Brute-force reference: enumerate every assignment of the axis ids and
//! index each array through its own multi-index.

use std::collections::HashMap;

use einstein_view::row_major_strides;
use strided_einstein::Label;

pub struct LoopOperand<'a, T> {
    pub dims: &'a [usize],
    pub labels: &'a [Label<i32>],
    pub data: &'a [T],
}

fn collect_axes(operands: &[(&[usize], &[Label<i32>])]) -> Vec<(i32, usize)> {
    let mut axes: Vec<(i32, usize)> = Vec::new();
    for (dims, labels) in operands {
        for (&dim, label) in dims.iter().zip(labels.iter()) {
            if let Label::Axis(id) = *label {
                if !axes.iter().any(|&(x, _)| x == id) {
                    axes.push((id, dim));
                }
            }
        }
    }
    axes
}

fn offset(dims: &[usize], labels: &[Label<i32>], assignment: &HashMap<i32, usize>) -> usize {
    labels
        .iter()
        .zip(row_major_strides(dims))
        .map(|(label, stride)| {
            let i = match *label {
                Label::Fixed(i) => i,
                Label::Axis(id) => assignment[&id],
            };
            i * stride
        })
        .sum()
}

/// `c[...] = combine(a[...], b[...], c[...])` over every assignment.
pub fn loop_einstein<T: Copy>(
    c_dims: &[usize],
    c_labels: &[Label<i32>],
    c: &mut [T],
    a: LoopOperand<'_, T>,
    b: LoopOperand<'_, T>,
    combine: impl Fn(T, T, T) -> T,
) {
    let axes = collect_axes(&[(a.dims, a.labels), (b.dims, b.labels), (c_dims, c_labels)]);
    let total: usize = axes.iter().map(|&(_, d)| d).product();
    let mut counter = vec![0usize; axes.len()];
    for _ in 0..total {
        let assignment: HashMap<i32, usize> = axes
            .iter()
            .zip(counter.iter())
            .map(|(&(id, _), &i)| (id, i))
            .collect();
        let ia = offset(a.dims, a.labels, &assignment);
        let ib = offset(b.dims, b.labels, &assignment);
        let ic = offset(c_dims, c_labels, &assignment);
        c[ic] = combine(a.data[ia], b.data[ib], c[ic]);

        for d in (0..counter.len()).rev() {
            counter[d] += 1;
            if counter[d] < axes[d].1 {
                break;
            }
            counter[d] = 0;
        }
    }
}
