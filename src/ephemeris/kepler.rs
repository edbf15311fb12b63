//! Kepler equation solver using Newton's method.
//!
//! The solver is iteration-capped. Hitting the cap is not an error: the best
//! estimate is returned together with `converged = false` so callers can log
//! or count the event.

use serde::{Deserialize, Serialize};

/// Outcome of one Kepler solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly E in radians (best estimate if not converged)
    pub eccentric_anomaly: f64,
    /// Whether the last Newton step was below tolerance
    pub converged: bool,
    /// Newton iterations performed
    pub iterations: u32,
}

/// Newton-Raphson settings for Kepler's equation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeplerSolver {
    /// Stop once |ΔE| drops below this (radians).
    pub tolerance: f64,
    /// Hard iteration cap.
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
        }
    }
}

impl KeplerSolver {
    /// Solve Kepler's equation M = E - e*sin(E) for eccentric anomaly E.
    ///
    /// Seeded at E₀ = M with no normalization of M. Valid for 0 ≤ e < 1.
    ///
    /// # Arguments
    /// * `mean_anomaly` - Mean anomaly M in radians
    /// * `eccentricity` - Orbital eccentricity
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
        let mut e_anomaly = mean_anomaly;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            // f(E) = E - e*sin(E) - M
            let f = e_anomaly - eccentricity * e_anomaly.sin() - mean_anomaly;
            // f'(E) = 1 - e*cos(E)
            let f_prime = 1.0 - eccentricity * e_anomaly.cos();

            let delta = f / f_prime;
            e_anomaly -= delta;
            iterations += 1;

            if delta.abs() < self.tolerance {
                return KeplerSolution {
                    eccentric_anomaly: e_anomaly,
                    converged: true,
                    iterations,
                };
            }
        }

        tracing::warn!(
            mean_anomaly,
            eccentricity,
            iterations,
            "Kepler solver hit iteration cap, returning best estimate"
        );

        KeplerSolution {
            eccentric_anomaly: e_anomaly,
            converged: false,
            iterations,
        }
    }
}

/// Solve Kepler's equation with the default tolerance (1e-8) and cap (100).
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    KeplerSolver::default().solve(mean_anomaly, eccentricity)
}
