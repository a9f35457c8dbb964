//! Stopping rules and search bounds for [`PriceCalibrator`](super::PriceCalibrator).

use hjm_core::{Real, Size};
use std::time::Duration;

/// Stopping rules and search bounds for the price fit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationSettings {
    /// Stop once successive `σ1` estimates differ by less than this.
    pub tolerance: Real,
    /// Maximum number of sweeps before giving up.
    pub max_iterations: Size,
    /// Initial upper end of the `σ1` bracket.
    pub sigma_upper_bound: Real,
    /// How many times the `σ1` bracket may be doubled.
    pub max_bracket_expansions: u32,
    /// Accuracy passed to the Brent solver.
    pub solver_accuracy: Real,
    /// Optional wall-clock budget for the whole fit.
    pub deadline: Option<Duration>,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-10,
            max_iterations: 1000,
            sigma_upper_bound: 1.0,
            max_bracket_expansions: 60,
            solver_accuracy: 1.0e-14,
            deadline: None,
        }
    }
}

impl CalibrationSettings {
    /// Set the `σ1` convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the sweep cap.
    pub fn with_max_iterations(mut self, max_iterations: Size) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the initial `σ1` bracket.
    pub fn with_sigma_upper_bound(mut self, sigma_upper_bound: Real) -> Self {
        self.sigma_upper_bound = sigma_upper_bound;
        self
    }

    /// Set the bracket doubling cap.
    pub fn with_max_bracket_expansions(mut self, max_bracket_expansions: u32) -> Self {
        self.max_bracket_expansions = max_bracket_expansions;
        self
    }

    /// Set the root-finder accuracy.
    pub fn with_solver_accuracy(mut self, solver_accuracy: Real) -> Self {
        self.solver_accuracy = solver_accuracy;
        self
    }

    /// Bound the fit by wall-clock time.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = CalibrationSettings::default();
        assert_eq!(s.tolerance, 1e-10);
        assert_eq!(s.max_iterations, 1000);
        assert_eq!(s.sigma_upper_bound, 1.0);
        assert_eq!(s.max_bracket_expansions, 60);
        assert_eq!(s.solver_accuracy, 1e-14);
        assert_eq!(s.deadline, None);
    }

    #[test]
    fn builders_chain() {
        let s = CalibrationSettings::default()
            .with_max_iterations(5)
            .with_tolerance(1e-6)
            .with_deadline(Duration::from_millis(10));
        assert_eq!(s.max_iterations, 5);
        assert_eq!(s.tolerance, 1e-6);
        assert_eq!(s.deadline, Some(Duration::from_millis(10)));
        assert_eq!(s.sigma_upper_bound, 1.0);
    }
}
