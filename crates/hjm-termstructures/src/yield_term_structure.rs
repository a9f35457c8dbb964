//! `YieldTermStructure`: yield / interest-rate term structures.
//!
//! A term structure here is defined on a closed time range
//! `[min_time, max_time]` and refuses to answer outside it.

use hjm_core::{errors::Result, DiscountFactor, Time};

/// A yield (interest-rate) term structure queried by time in years.
pub trait YieldTermStructure: std::fmt::Debug + Send + Sync {
    /// Discount factor `P(0, t)`.
    ///
    /// # Errors
    /// `InvalidArgument` if `t` lies outside `[min_time, max_time]`.
    fn discount(&self, t: Time) -> Result<DiscountFactor>;

    /// Earliest time the structure can be queried at.
    fn min_time(&self) -> Time;

    /// Latest time the structure can be queried at.
    fn max_time(&self) -> Time;
}
