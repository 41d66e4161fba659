//! Shared traits for the strided-einstein ecosystem.
//!
//! This crate provides the element-level pieces that the planner and the
//! executor agree on: the [`Contraction`] policy applied at every point of the
//! iteration space, and [`ContractElement`], which picks the default policy
//! for an element type.
//!
//! External crates can depend on `einstein-traits` to implement these traits
//! for their own element types without orphan rule violations.

pub mod contraction;
pub mod element;

pub use contraction::{from_fn, AccumulateMul, AccumulateOr, Contraction, FromFn};
pub use element::{BitMask, ContractElement};
