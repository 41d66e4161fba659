//! Element types and their default contraction policy.

use std::ops::{Add, BitAnd, BitOr, BitOrAssign};

use num_complex::Complex;
use num_traits::{Num, Zero};

use crate::contraction::{AccumulateMul, AccumulateOr, Contraction};

/// Element types that know which [`Contraction`] they use by default.
///
/// Numeric types accumulate products; [`BitMask`] accumulates unions. Custom
/// element types opt in with a one-line impl:
/// ```
/// use einstein_traits::{AccumulateMul, ContractElement};
///
/// #[derive(Clone, Copy)]
/// struct Meters(f64);
/// # impl std::ops::Add for Meters { type Output = Self; fn add(self, o: Self) -> Self { Meters(self.0 + o.0) } }
/// # impl std::ops::Mul for Meters { type Output = Self; fn mul(self, o: Self) -> Self { Meters(self.0 * o.0) } }
/// impl ContractElement for Meters {
///     type DefaultOp = AccumulateMul;
/// }
/// ```
pub trait ContractElement: Copy {
    type DefaultOp: Contraction<Self> + Default;
}

macro_rules! impl_contract_element_numeric {
    ($($t:ty),*) => {
        $(impl ContractElement for $t {
            type DefaultOp = AccumulateMul;
        })*
    };
}

impl_contract_element_numeric!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl<T: Num + Copy> ContractElement for Complex<T> {
    type DefaultOp = AccumulateMul;
}

/// 64 dependency bits per element.
///
/// Used when a contraction propagates "which inputs influence this output"
/// instead of numeric values. Addition is set union, so `BitMask::zero()` is
/// the empty pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitMask(pub u64);

impl BitMask {
    pub const EMPTY: BitMask = BitMask(0);
    pub const FULL: BitMask = BitMask(u64::MAX);

    /// Mask with only bit `i` set.
    #[inline]
    pub fn bit(i: u32) -> Self {
        BitMask(1u64 << i)
    }

    #[inline]
    pub fn contains(self, other: BitMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for BitMask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        BitMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for BitMask {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for BitMask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        BitMask(self.0 & rhs.0)
    }
}

impl Add for BitMask {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self | rhs
    }
}

impl Zero for BitMask {
    fn zero() -> Self {
        BitMask::EMPTY
    }
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for BitMask {
    fn from(bits: u64) -> Self {
        BitMask(bits)
    }
}

impl ContractElement for BitMask {
    type DefaultOp = AccumulateOr;
}
