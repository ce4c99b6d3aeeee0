use crate::base::Config;
use crate::StrError;
use russell_lab::{vec_copy, vec_inner, vec_max_scaled, vec_norm, Norm, Vector};

/// Indicates the outcome of a convergence check
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// The iterations satisfy at least one convergence criterion
    Converged,

    /// Not converged yet; the iterations may continue
    Iterating,

    /// The iteration budget is exhausted without convergence
    Failed,
}

/// Controls the convergence of the global nonlinear iterations
///
/// Tracks the convergence metrics and decides whether the solution is
/// converging, diverging, or done, based on:
///
/// 1. Residual forces norm (`norm_rr`; absolute)
/// 2. Relative displacement increment (`rel_mdu`; max-scaled)
/// 3. Energy product |R · ΔU| (enabled when `tol_energy_abs > 0`)
///
/// The controller never mutates the solver state; it only observes the
/// residual and solution vectors handed to the analyze methods.
pub struct ConvergenceControl<'a> {
    config: &'a Config,
    iteration: usize,
    norm_rr_prev: f64,
    norm_rr: f64,
    mdu0: Vector,
    norm_mdu: f64,
    rel_mdu_prev: f64,
    rel_mdu: f64,
    energy: f64,
    converged_on_norm_rr: bool,
    diverging_on_norm_rr: bool,
    converged_on_rel_mdu: bool,
    diverging_on_rel_mdu: bool,
    converged_on_energy: bool,
    n_converged_total: usize,
    n_failed_per_step: usize,
}

impl<'a> ConvergenceControl<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, neq_total: usize) -> Self {
        ConvergenceControl {
            config,
            iteration: 0,
            norm_rr_prev: 0.0,
            norm_rr: 0.0,
            mdu0: Vector::new(neq_total),
            norm_mdu: 0.0,
            rel_mdu_prev: 0.0,
            rel_mdu: 0.0,
            energy: 0.0,
            converged_on_norm_rr: false,
            diverging_on_norm_rr: false,
            converged_on_rel_mdu: false,
            diverging_on_rel_mdu: false,
            converged_on_energy: false,
            n_converged_total: 0,
            n_failed_per_step: 0,
        }
    }

    // setters

    /// Resets the failure counter for a new load/time step
    ///
    /// Must not be called between retry attempts of the same step, otherwise
    /// the failure budget can never be exhausted.
    pub fn reset_failures(&mut self) {
        self.n_failed_per_step = 0;
    }

    /// Resets the convergence flags for a new iteration sequence
    pub fn reset(&mut self) {
        self.converged_on_norm_rr = false;
        self.diverging_on_norm_rr = false;
        self.converged_on_rel_mdu = false;
        self.diverging_on_rel_mdu = false;
        self.converged_on_energy = false;
    }

    /// Marks the step as converged (linear problems skip the iteration loop)
    pub fn set_converged_linear_problem(&mut self) {
        self.converged_on_norm_rr = true;
    }

    /// Increments the total number of converged steps
    pub fn add_converged(&mut self) {
        self.n_converged_total += 1;
    }

    /// Increments the number of failed attempts in the current step
    pub fn add_failed(&mut self) {
        self.n_failed_per_step += 1;
    }

    // getters

    /// Checks if the number of failed attempts exceeds the allowed maximum
    pub fn too_many_failures(&self) -> bool {
        self.n_failed_per_step >= self.config.allowed_step_n_failure
    }

    /// Returns the total number of converged steps
    pub fn n_converged_total(&self) -> usize {
        self.n_converged_total
    }

    /// Checks if the solution has converged on any criterion
    pub fn converged(&self) -> bool {
        self.converged_on_norm_rr || self.converged_on_rel_mdu || self.converged_on_energy
    }

    /// Checks if the solution is diverging on any criterion
    pub fn diverging(&self) -> bool {
        self.diverging_on_norm_rr || self.diverging_on_rel_mdu
    }

    /// Returns the tri-state status given the current iteration number
    pub fn status(&self, iteration: usize) -> Status {
        if self.converged() {
            Status::Converged
        } else if iteration + 1 >= self.config.n_max_iterations {
            Status::Failed
        } else {
            Status::Iterating
        }
    }

    // analysis

    /// Analyzes the convergence based on the residual forces
    pub(crate) fn analyze_rr(&mut self, iteration: usize, rr: &Vector) -> Result<(), StrError> {
        // record iteration index
        self.iteration = iteration;

        // compute the norm of R
        self.norm_rr = vec_norm(rr, Norm::Max);

        // check for NaN or Inf
        let found_nan_or_inf = !self.norm_rr.is_finite();

        // check convergence
        self.converged_on_norm_rr = if found_nan_or_inf {
            false
        } else {
            self.norm_rr < self.config.tol_rr_abs
        };

        // check if diverging
        self.diverging_on_norm_rr = if found_nan_or_inf || iteration == 0 {
            false
        } else {
            self.norm_rr > self.norm_rr_prev
        };

        // record the norm at subsequent iterations
        self.norm_rr_prev = self.norm_rr;

        // done
        if found_nan_or_inf {
            Err("Found NaN or Inf")
        } else {
            Ok(())
        }
    }

    /// Analyzes the convergence based on the displacement increment
    pub(crate) fn analyze_mdu(&mut self, iteration: usize, mdu: &Vector, rr: &Vector) -> Result<(), StrError> {
        // compute the norm of mdu
        self.norm_mdu = vec_norm(mdu, Norm::Max);

        // check for NaN or Inf
        let found_nan_or_inf = !self.norm_mdu.is_finite();

        // set the first mdu value
        if self.iteration == 0 {
            vec_copy(&mut self.mdu0, mdu).unwrap();
            self.rel_mdu = 1.0;
        }

        // check convergence on the relative displacement increment
        self.converged_on_rel_mdu = if found_nan_or_inf || iteration == 0 {
            false
        } else {
            //                 /    |mduᵢ|   \
            // rel_mdu = max_i | ——————————— |
            //                 \ 1 + |mdu0ᵢ| /
            self.rel_mdu = vec_max_scaled(mdu, &self.mdu0);
            self.rel_mdu < self.config.tol_mdu_rel
        };

        // check convergence on the energy product
        self.converged_on_energy = if found_nan_or_inf || iteration == 0 || self.config.tol_energy_abs <= 0.0 {
            false
        } else {
            self.energy = f64::abs(vec_inner(rr, mdu));
            self.energy < self.config.tol_energy_abs
        };

        // check if diverging
        self.diverging_on_rel_mdu = if found_nan_or_inf || iteration < 2 {
            false
        } else {
            self.rel_mdu > self.rel_mdu_prev
        };

        // record the norm at subsequent iterations
        self.rel_mdu_prev = self.rel_mdu;

        // done
        if found_nan_or_inf {
            Err("Found NaN or Inf in mdu")
        } else {
            Ok(())
        }
    }

    /// Prints the header before the time stepping
    pub fn print_header(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("\nTIME STEPPING AND CONVERGENCE STATISTICS");
            println!("\nLegend:");
            println!("  * -- converged");
            println!("  . -- converging");
            println!("  ! -- diverging\n");
            println!("{}", "-".repeat(75));
            println!(
                "{:8} {:>11} {:>11} {:>5} {:>11}   {:>11}   {:>11}  ",
                "timestep", "t", "dt", "iter", "|mdu|max", "rel(mdu)", "|R|max"
            );
            println!("{}", "-".repeat(75));
        }
    }

    /// Prints the timestep information
    pub(crate) fn print_timestep(&self, timestep: usize, t: f64, dt: f64) {
        if self.config.verbose_timesteps {
            println!("{:>8} {:>11.6e} {:>11.6e}", timestep + 1, t, dt);
        }
    }

    /// Prints the iteration information
    pub(crate) fn print_iteration(&self) {
        if self.config.verbose_iterations {
            let it = self.iteration;
            if it == 0 {
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>11.4e}   {:>11}   {:>11.4e}  ",
                    ".", ".", ".", it, self.norm_mdu, ".", self.norm_rr
                );
            } else {
                let icon_rr = if self.converged_on_norm_rr {
                    "*"
                } else if self.diverging_on_norm_rr {
                    "!"
                } else {
                    "."
                };
                let icon_mdu = if self.converged_on_rel_mdu || self.converged_on_energy {
                    "*"
                } else if self.diverging_on_rel_mdu {
                    "!"
                } else {
                    "."
                };
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>11.4e} {} {:>11.4e} {} {:>11.4e} {}",
                    ".", ".", ".", it, self.norm_mdu, icon_mdu, self.rel_mdu, ".", self.norm_rr, icon_rr
                );
            }
        }
    }

    /// Prints the horizontal line at the end of the analysis
    pub(crate) fn print_footer(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{}", "-".repeat(75));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ConvergenceControl, Status};
    use crate::base::Config;
    use russell_lab::Vector;

    #[test]
    fn analyze_rr_works() {
        let config = Config::new();
        let mut control = ConvergenceControl::new(&config, 2);
        let rr = Vector::from(&[1e-3, -2e-3]);
        control.analyze_rr(0, &rr).unwrap();
        assert!(!control.converged());
        assert!(!control.diverging());

        // below the absolute tolerance
        let rr = Vector::from(&[1e-9, -5e-10]);
        control.analyze_rr(1, &rr).unwrap();
        assert!(control.converged());
        assert_eq!(control.status(1), Status::Converged);

        // growing norm flags divergence
        control.reset();
        let rr = Vector::from(&[1e-3, 0.0]);
        control.analyze_rr(0, &rr).unwrap();
        let rr = Vector::from(&[2e-3, 0.0]);
        control.analyze_rr(1, &rr).unwrap();
        assert!(control.diverging());
    }

    #[test]
    fn analyze_rr_captures_nan_and_inf() {
        let config = Config::new();
        let mut control = ConvergenceControl::new(&config, 2);
        let rr = Vector::from(&[f64::NAN, 0.0]);
        assert_eq!(control.analyze_rr(0, &rr).err(), Some("Found NaN or Inf"));
        let rr = Vector::from(&[0.0, f64::INFINITY]);
        assert_eq!(control.analyze_rr(0, &rr).err(), Some("Found NaN or Inf"));
    }

    #[test]
    fn analyze_mdu_works() {
        let config = Config::new();
        let mut control = ConvergenceControl::new(&config, 2);
        let rr = Vector::from(&[1.0, 1.0]);
        let mdu = Vector::from(&[1e-2, 1e-2]);
        control.analyze_rr(0, &rr).unwrap();
        control.analyze_mdu(0, &mdu, &rr).unwrap();
        assert!(!control.converged()); // never on the first iteration

        // small increment relative to the first one
        let mdu_small = Vector::from(&[1e-12, 1e-12]);
        control.analyze_rr(1, &rr).unwrap();
        control.analyze_mdu(1, &mdu_small, &rr).unwrap();
        assert!(control.converged());
    }

    #[test]
    fn energy_criterion_works() {
        let mut config = Config::new();
        config.tol_energy_abs = 1e-12;
        let mut control = ConvergenceControl::new(&config, 2);
        let rr = Vector::from(&[1e-5, 0.0]);
        let mdu = Vector::from(&[1e-2, 0.0]);
        control.analyze_rr(0, &rr).unwrap();
        control.analyze_mdu(0, &mdu, &rr).unwrap();
        assert!(!control.converged());

        // |R · mdu| = 1e-5 · 1e-9 = 1e-14 < 1e-12
        let mdu = Vector::from(&[1e-9, 0.0]);
        control.analyze_rr(1, &rr).unwrap();
        control.analyze_mdu(1, &mdu, &rr).unwrap();
        assert!(control.converged());

        // disabled when the tolerance is zero
        let config = Config::new();
        let mut control = ConvergenceControl::new(&config, 2);
        let mdu_first = Vector::from(&[1e-2, 0.0]);
        control.analyze_rr(0, &rr).unwrap();
        control.analyze_mdu(0, &mdu_first, &rr).unwrap();
        let mdu = Vector::from(&[1e-3, 0.0]);
        control.analyze_rr(1, &rr).unwrap();
        control.analyze_mdu(1, &mdu, &rr).unwrap();
        assert!(!control.converged());
    }

    #[test]
    fn status_and_failures_work() {
        let config = Config::new(); // n_max_iterations = 10
        let mut control = ConvergenceControl::new(&config, 1);
        let rr = Vector::from(&[1.0]);
        control.analyze_rr(0, &rr).unwrap();
        assert_eq!(control.status(0), Status::Iterating);
        assert_eq!(control.status(9), Status::Failed);

        control.set_converged_linear_problem();
        assert_eq!(control.status(0), Status::Converged);

        control.reset_failures();
        assert!(!control.too_many_failures());
        for _ in 0..config.allowed_step_n_failure {
            control.add_failed();
        }
        assert!(control.too_many_failures());

        // the flag reset between retry attempts keeps the failure count
        control.reset();
        assert!(control.too_many_failures());
        control.reset_failures();
        assert!(!control.too_many_failures());

        control.add_converged();
        assert_eq!(control.n_converged_total(), 1);
    }
}
