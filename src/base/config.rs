use super::{Algorithm, Numberer};
use russell_sparse::{Genie, LinSolParams};

/// Holds the configuration of a solution procedure
///
/// This structure aggregates the numberer, constraint handling method,
/// integrator selection (static load control or Newmark transient),
/// solution algorithm, linear solver kind, and convergence test settings.
pub struct Config {
    /// Linear problem: stop after the first iteration (no Newton loop)
    pub linear_problem: bool,

    /// Transient analysis with Newmark time integration (otherwise static load control)
    pub transient: bool,

    /// Nonlinear solution algorithm
    pub algorithm: Algorithm,

    /// Enforces prescribed displacements with Lagrange multipliers
    ///
    /// Required for non-zero prescribed values; otherwise the prescribed
    /// equations are masked and ones are put on the diagonal.
    pub lagrange_mult_method: bool,

    /// DOF numbering strategy
    pub numberer: Numberer,

    /// Linear solver kind
    pub lin_sol_genie: Genie,

    /// Parameters for the linear solver
    pub lin_sol_params: LinSolParams,

    /// Ignores the symmetry of local jacobians when assembling the global matrix
    pub ignore_jacobian_symmetry: bool,

    /// Absolute tolerance on the residual norm ‖R‖∞
    pub tol_rr_abs: f64,

    /// Relative tolerance on the max-scaled corrective displacement
    pub tol_mdu_rel: f64,

    /// Absolute tolerance on the energy product |R · ΔU| (0 disables the check)
    pub tol_energy_abs: f64,

    /// Maximum number of global iterations per step
    pub n_max_iterations: usize,

    /// Maximum number of (pseudo) time steps
    pub n_max_time_steps: usize,

    /// Initial (pseudo) time
    pub t_ini: f64,

    /// Final (pseudo) time
    pub t_fin: f64,

    /// Time step as a function of time
    pub dt: Box<dyn Fn(f64) -> f64>,

    /// Output increment as a function of time
    pub dt_out: Box<dyn Fn(f64) -> f64>,

    /// Minimum allowed time step (for the adaptive step reduction)
    pub dt_min: f64,

    /// Halves the time step and retries the step upon non-convergence
    pub divergence_control: bool,

    /// Maximum number of step-halving retries per step
    pub allowed_step_n_failure: usize,

    /// Load factor λ(t) scaling the concentrated loads (static analyses)
    pub load_factor: Box<dyn Fn(f64) -> f64>,

    /// Newmark parameter β
    pub newmark_beta: f64,

    /// Newmark parameter γ
    pub newmark_gamma: f64,

    /// Prints time stepping messages
    pub verbose_timesteps: bool,

    /// Prints iteration convergence messages
    pub verbose_iterations: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            linear_problem: false,
            transient: false,
            algorithm: Algorithm::NewtonRaphson,
            lagrange_mult_method: false,
            numberer: Numberer::Plain,
            lin_sol_genie: Genie::Umfpack,
            lin_sol_params: LinSolParams::new(),
            ignore_jacobian_symmetry: false,
            tol_rr_abs: 1e-8,
            tol_mdu_rel: 1e-8,
            tol_energy_abs: 0.0,
            n_max_iterations: 10,
            n_max_time_steps: 1_000,
            t_ini: 0.0,
            t_fin: 1.0,
            dt: Box::new(|_| 1.0),
            dt_out: Box::new(|_| 1.0),
            dt_min: 1e-10,
            divergence_control: false,
            allowed_step_n_failure: 5,
            load_factor: Box::new(|t| t),
            newmark_beta: 0.25,
            newmark_gamma: 0.5,
            verbose_timesteps: false,
            verbose_iterations: false,
        }
    }

    /// Validates all data; returns a message explaining the first error found
    pub fn validate(&self) -> Option<String> {
        if self.tol_rr_abs <= 0.0 {
            return Some(format!("tol_rr_abs = {:?} is incorrect; it must be > 0", self.tol_rr_abs));
        }
        if self.tol_mdu_rel <= 0.0 {
            return Some(format!(
                "tol_mdu_rel = {:?} is incorrect; it must be > 0",
                self.tol_mdu_rel
            ));
        }
        if self.tol_energy_abs < 0.0 {
            return Some(format!(
                "tol_energy_abs = {:?} is incorrect; it must be ≥ 0",
                self.tol_energy_abs
            ));
        }
        if self.n_max_iterations < 1 {
            return Some("n_max_iterations must be ≥ 1".to_string());
        }
        if self.t_fin < self.t_ini {
            return Some(format!(
                "t_fin = {:?} is incorrect; it must be ≥ t_ini = {:?}",
                self.t_fin, self.t_ini
            ));
        }
        if self.dt_min <= 0.0 {
            return Some(format!("dt_min = {:?} is incorrect; it must be > 0", self.dt_min));
        }
        let dt = (self.dt)(self.t_ini);
        if dt < self.dt_min {
            return Some(format!("dt = {:?} is incorrect; it must be ≥ dt_min = {:?}", dt, self.dt_min));
        }
        if self.transient {
            if self.newmark_beta <= 0.0 || self.newmark_beta > 0.5 {
                return Some(format!(
                    "newmark_beta = {:?} is incorrect; it must be 0 < β ≤ 0.5",
                    self.newmark_beta
                ));
            }
            if self.newmark_gamma < 0.5 || self.newmark_gamma > 1.0 {
                return Some(format!(
                    "newmark_gamma = {:?} is incorrect; it must be 0.5 ≤ γ ≤ 1",
                    self.newmark_gamma
                ));
            }
        }
        None
    }

    /// Sets the linear problem flag
    pub fn set_linear_problem(&mut self, flag: bool) -> &mut Self {
        self.linear_problem = flag;
        self
    }

    /// Enables a transient analysis with Newmark time integration
    pub fn set_transient(&mut self, flag: bool) -> &mut Self {
        self.transient = flag;
        self
    }

    /// Sets the nonlinear solution algorithm
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    /// Enables the Lagrange multiplier method for prescribed displacements
    pub fn set_lagrange_mult_method(&mut self, flag: bool) -> &mut Self {
        self.lagrange_mult_method = flag;
        self
    }

    /// Sets the DOF numbering strategy
    pub fn set_numberer(&mut self, numberer: Numberer) -> &mut Self {
        self.numberer = numberer;
        self
    }

    /// Sets the linear solver kind
    pub fn set_lin_sol_genie(&mut self, genie: Genie) -> &mut Self {
        self.lin_sol_genie = genie;
        self
    }

    /// Sets the absolute tolerance on the residual norm
    pub fn set_tol_rr_abs(&mut self, tol: f64) -> &mut Self {
        self.tol_rr_abs = tol;
        self
    }

    /// Sets the relative tolerance on the corrective displacement
    pub fn set_tol_mdu_rel(&mut self, tol: f64) -> &mut Self {
        self.tol_mdu_rel = tol;
        self
    }

    /// Sets the absolute tolerance on the energy product (0 disables the check)
    pub fn set_tol_energy_abs(&mut self, tol: f64) -> &mut Self {
        self.tol_energy_abs = tol;
        self
    }

    /// Sets the maximum number of global iterations per step
    pub fn set_n_max_iterations(&mut self, n: usize) -> &mut Self {
        self.n_max_iterations = n;
        self
    }

    /// Sets the maximum number of (pseudo) time steps
    pub fn set_n_max_time_steps(&mut self, n: usize) -> &mut Self {
        self.n_max_time_steps = n;
        self
    }

    /// Sets the initial time
    pub fn set_t_ini(&mut self, t_ini: f64) -> &mut Self {
        self.t_ini = t_ini;
        self
    }

    /// Sets the final time
    pub fn set_t_fin(&mut self, t_fin: f64) -> &mut Self {
        self.t_fin = t_fin;
        self
    }

    /// Sets the time step as a function of time
    pub fn set_dt(&mut self, dt: impl Fn(f64) -> f64 + 'static) -> &mut Self {
        self.dt = Box::new(dt);
        self
    }

    /// Sets the output increment as a function of time
    pub fn set_dt_out(&mut self, dt_out: impl Fn(f64) -> f64 + 'static) -> &mut Self {
        self.dt_out = Box::new(dt_out);
        self
    }

    /// Sets the minimum allowed time step
    pub fn set_dt_min(&mut self, dt_min: f64) -> &mut Self {
        self.dt_min = dt_min;
        self
    }

    /// Enables the adaptive step reduction upon non-convergence
    pub fn set_divergence_control(&mut self, flag: bool) -> &mut Self {
        self.divergence_control = flag;
        self
    }

    /// Sets the maximum number of step-halving retries per step
    pub fn set_allowed_step_n_failure(&mut self, n: usize) -> &mut Self {
        self.allowed_step_n_failure = n;
        self
    }

    /// Sets the load factor λ(t) scaling the concentrated loads
    pub fn set_load_factor(&mut self, lf: impl Fn(f64) -> f64 + 'static) -> &mut Self {
        self.load_factor = Box::new(lf);
        self
    }

    /// Sets the Newmark parameters (β, γ)
    pub fn set_newmark_params(&mut self, beta: f64, gamma: f64) -> &mut Self {
        self.newmark_beta = beta;
        self.newmark_gamma = gamma;
        self
    }

    /// Enables/disables printed messages
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool) -> &mut Self {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
