//! Thread-safety bounds that only bite when execution can go parallel.
//!
//! Element types must be [`MaybeSendSync`] and contraction operations
//! [`MaybeSync`]. With the `parallel` feature these require `Send + Sync`
//! and `Sync`, because buffers and the operation are shared across rayon
//! tasks. Without it both are implemented for every type, so a contraction
//! closure that captures a `Cell` or an `Rc` still runs on the serial path.

#[cfg(feature = "parallel")]
mod bounds {
    /// Contraction operations shared by reference across worker tasks.
    pub trait MaybeSync: Sync {}
    impl<T: Sync> MaybeSync for T {}

    /// Element types read and written from worker tasks.
    pub trait MaybeSendSync: Send + Sync {}
    impl<T: Send + Sync> MaybeSendSync for T {}
}

#[cfg(not(feature = "parallel"))]
mod bounds {
    pub trait MaybeSync {}
    impl<T> MaybeSync for T {}

    pub trait MaybeSendSync {}
    impl<T> MaybeSendSync for T {}
}

pub use bounds::{MaybeSendSync, MaybeSync};
