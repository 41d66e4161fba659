//! Elementwise combine-and-accumulate operations.
//!
//! The executor visits every legal `(a, b, c)` element triple of a planned
//! contraction and hands it to a [`Contraction`]. Two policies cover the
//! uses of the engine:
//! - [`AccumulateMul`]: `c += a * b`, numeric tensor contraction
//! - [`AccumulateOr`]: `c |= a | b`, dependency bit-pattern propagation
//!
//! Both accumulate, neither overwrites. Repeated visits to the same output
//! element under a summed axis are what implement Einstein summation.

use std::ops::{Add, BitOr, Mul};

/// Combine one element of each input into an output element, in place.
pub trait Contraction<T> {
    fn combine(&self, a: T, b: T, c: &mut T);
}

/// Numeric accumulation: `c = c + a * b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateMul;

/// Bit-pattern accumulation: `c = c | (a | b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateOr;

impl<T> Contraction<T> for AccumulateMul
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
{
    #[inline(always)]
    fn combine(&self, a: T, b: T, c: &mut T) {
        *c = *c + a * b;
    }
}

impl<T> Contraction<T> for AccumulateOr
where
    T: Copy + BitOr<Output = T>,
{
    #[inline(always)]
    fn combine(&self, a: T, b: T, c: &mut T) {
        *c = *c | (a | b);
    }
}

/// Adapter turning a closure into a [`Contraction`].
///
/// Build one with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Use `f(a, b, &mut c)` as the contraction operation.
///
/// ```
/// use einstein_traits::{from_fn, Contraction};
///
/// // tropical (max, +) accumulation
/// let op = from_fn(|a: f64, b: f64, c: &mut f64| *c = c.max(a + b));
/// let mut c = f64::NEG_INFINITY;
/// op.combine(1.0, 2.0, &mut c);
/// op.combine(0.5, 0.5, &mut c);
/// assert_eq!(c, 3.0);
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(T, T, &mut T),
{
    FromFn(f)
}

impl<T, F> Contraction<T> for FromFn<F>
where
    F: Fn(T, T, &mut T),
{
    #[inline(always)]
    fn combine(&self, a: T, b: T, c: &mut T) {
        (self.0)(a, b, c)
    }
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}
