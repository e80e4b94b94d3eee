use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdIndexError {
    /// A point's arity did not match the tree's dimension, or a tree was
    /// constructed with dimension zero.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A malformed numeric argument, such as a negative search radius.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
