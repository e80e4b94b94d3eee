use std::fmt::Debug;

use num_traits::Float;

/// A trait for scalar types that can be used as tree coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Stored
/// points are real-valued, so only the floating-point primitives qualify.
pub trait CoordFloat: private::Sealed + Float + Debug + Send + Sync {}

impl CoordFloat for f32 {}

impl CoordFloat for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
