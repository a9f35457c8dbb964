//! Error types for the hjm workspace.
//!
//! Every fallible operation returns [`Result`] with one of four failure
//! kinds. The `ensure!`, `ensure_domain!` and `fail!` macros are the usual
//! way of raising them at the point of detection.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed or out-of-range input: mismatched lengths, too few knots,
    /// an extrapolation attempt, an option expiring after its bond.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The result is mathematically undefined (zero variance, `lambda = 0`).
    #[error("domain error: {0}")]
    DomainError(String),

    /// A calibration linear system has no unique solution.
    #[error("singular system: {0}")]
    SingularSystem(String),

    /// An iterative search exhausted its iteration bound or deadline.
    #[error("convergence failure: {0}")]
    ConvergenceFailure(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use hjm_core::{ensure, errors::Error};
/// fn positive(x: f64) -> hjm_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::DomainError(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use hjm_core::{ensure_domain, errors::Error};
/// fn root(x: f64) -> hjm_core::errors::Result<f64> {
///     ensure_domain!(x >= 0.0, "cannot take the square root of {x}");
///     Ok(x.sqrt())
/// }
/// assert!(root(4.0).is_ok());
/// assert!(matches!(root(-1.0), Err(Error::DomainError(_))));
/// ```
#[macro_export]
macro_rules! ensure_domain {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::DomainError(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidArgument(...))` immediately.
///
/// # Example
/// ```
/// use hjm_core::{fail, errors::Error};
/// fn always_err() -> hjm_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::InvalidArgument(format!($($msg)*)))
    };
}
