//! Per-axis labels: a fixed position or a named iteration axis.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait alias for axis identifier types.
pub trait AxisId: Clone + Eq + Hash + Debug {}
impl<T: Clone + Eq + Hash + Debug> AxisId for T {}

/// Role of one axis of an array in a contraction.
///
/// `Fixed(i)` pins the axis to position `i` and only moves the array's base
/// offset. `Axis(id)` makes the axis iterate; every axis sharing `id`,
/// in any of the three arrays (or twice in the same array), moves together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label<ID = i32> {
    Fixed(usize),
    Axis(ID),
}

impl<ID> Label<ID> {
    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Label::Fixed(_))
    }

    #[inline]
    pub fn axis_id(&self) -> Option<&ID> {
        match self {
            Label::Fixed(_) => None,
            Label::Axis(id) => Some(id),
        }
    }
}

impl Label<i32> {
    /// Decode the signed-integer convention: a non-negative value is a fixed
    /// index, a negative value names an iteration axis.
    ///
    /// ```
    /// use strided_einstein::Label;
    ///
    /// assert_eq!(Label::from_signed(2), Label::Fixed(2));
    /// assert_eq!(Label::from_signed(-1), Label::Axis(-1));
    /// ```
    #[inline]
    pub fn from_signed(value: i32) -> Self {
        if value >= 0 {
            Label::Fixed(value as usize)
        } else {
            Label::Axis(value)
        }
    }
}

impl From<i32> for Label<i32> {
    fn from(value: i32) -> Self {
        Label::from_signed(value)
    }
}

/// Decode a whole label vector in the signed-integer convention.
pub fn labels_from_signed(values: &[i32]) -> Vec<Label<i32>> {
    values.iter().map(|&v| Label::from_signed(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signed() {
        assert_eq!(
            labels_from_signed(&[0, -1, 3, -7]),
            vec![
                Label::Fixed(0),
                Label::Axis(-1),
                Label::Fixed(3),
                Label::Axis(-7)
            ]
        );
        assert_eq!(Label::from(-2), Label::Axis(-2));
    }

    #[test]
    fn test_accessors() {
        let fixed: Label<char> = Label::Fixed(1);
        let axis: Label<char> = Label::Axis('i');
        assert!(fixed.is_fixed());
        assert!(!axis.is_fixed());
        assert_eq!(fixed.axis_id(), None);
        assert_eq!(axis.axis_id(), Some(&'i'));
    }
}
