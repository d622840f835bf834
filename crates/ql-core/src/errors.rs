//! Error types for quantlib-numerics.
//!
//! Every fallible operation in the workspace returns [`Result`]. Contract
//! violations are raised through the `ensure!`, `ensure_arg!`,
//! `ensure_post!` and `fail!` macros defined here.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime failure.
    #[error("{0}")]
    Runtime(String),

    /// A caller contract was violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A result invariant was violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Malformed input, e.g. arrays of mismatched sizes.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Storage for an array or matrix could not be allocated.
    #[error("unable to allocate storage for {requested} elements")]
    Allocation {
        /// Number of elements requested.
        requested: usize,
    },

    /// A numerical procedure broke down (zero pivot, non-finite value, ...).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_arg, errors::Error};
/// fn same_len(a: &[f64], b: &[f64]) -> ql_core::errors::Result<()> {
///     ensure_arg!(a.len() == b.len(), "sizes differ: {} vs {}", a.len(), b.len());
///     Ok(())
/// }
/// assert!(same_len(&[1.0], &[2.0]).is_ok());
/// assert!(matches!(same_len(&[1.0], &[]), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure_arg {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
