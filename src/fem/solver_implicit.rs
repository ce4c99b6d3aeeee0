use super::{BcConcentratedArray, BcPrescribedArray, TransientVars};
use super::{ConvergenceControl, Elements, FemBase, FemState, FileIo, LinearSystem, Status};
use crate::base::{Algorithm, Config, Essential, Model, Natural};
use crate::StrError;
use russell_lab::vec_add;

/// Implements the implicit (static or Newmark transient) Newton-Raphson solver
pub struct SolverImplicit<'a> {
    /// Holds configuration parameters
    pub config: &'a Config,

    /// Holds a collection of concentrated loads
    pub bc_concentrated: BcConcentratedArray,

    /// Holds a collection of prescribed (primary) values
    pub bc_prescribed: BcPrescribedArray,

    /// Holds a collection of elements
    pub elements: Elements,

    /// Holds variables to solve the global linear system
    pub linear_system: LinearSystem<'a>,
}

impl<'a> SolverImplicit<'a> {
    /// Allocates a new instance
    pub fn new(
        model: &Model,
        base: &FemBase,
        config: &'a Config,
        essential: &Essential,
        natural: &Natural,
    ) -> Result<Self, StrError> {
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because config.validate() failed");
        }
        let bc_concentrated = BcConcentratedArray::new(base, natural)?;
        let bc_prescribed = BcPrescribedArray::new(base, essential)?;
        if !config.lagrange_mult_method && bc_prescribed.has_non_zero() {
            return Err("the Lagrange multiplier method is required for non-zero prescribed values");
        }
        let elements = Elements::new(model, base)?;
        let linear_system = LinearSystem::new(base, config, &bc_prescribed, &elements)?;
        Ok(SolverImplicit {
            config,
            bc_concentrated,
            bc_prescribed,
            elements,
            linear_system,
        })
    }

    /// Runs the load/time stepping with the global Newton-Raphson iterations
    ///
    /// The time loop follows the config: `t_ini`, `t_fin`, and the `dt`
    /// function. See also [SolverImplicit::solve_for] for a fixed number of steps.
    pub fn solve(&mut self, state: &mut FemState, file_io: &mut FileIo) -> Result<(), StrError> {
        // helper macro to save the state before returning an error
        macro_rules! run {
            ($e:expr) => {
                match $e {
                    Ok(val) => val,
                    Err(err) => {
                        match file_io.write_state(state) {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write state due to: {}", e),
                        }
                        match file_io.write_self() {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write summary due to: {}", e),
                        }
                        return Err(err);
                    }
                }
            };
        }

        // array to ignore prescribed equations when building the reduced system
        let config = self.config;
        let (ignore, triangular) = self.prepare_assembly();

        // first output
        file_io.write_state(state)?;
        let mut t_out = state.t + (config.dt_out)(state.t);

        // allocate convergence control
        let mut control = ConvergenceControl::new(config, self.linear_system.neq_total);
        control.print_header();

        // time loop
        for timestep in 0..config.n_max_time_steps {
            // update time
            state.dt = (config.dt)(state.t);
            if state.t + state.dt > config.t_fin {
                break;
            }

            // run the step, with adaptive step reduction upon failure
            run!(self.step_with_retry(state, &mut control, timestep, &ignore, triangular));

            // accept the converged configuration
            state.commit();
            self.elements.commit_state();

            // perform output
            let last_timestep = timestep == config.n_max_time_steps - 1;
            if state.t >= t_out || last_timestep {
                file_io.write_state(state)?;
                t_out += (config.dt_out)(state.t);
            }

            // final time step
            if state.t >= config.t_fin {
                break;
            }
        }

        // footer and summary file
        control.print_footer();
        file_io.write_self()
    }

    /// Runs a fixed number of steps with a fixed step size
    ///
    /// Ignores `t_ini`, `t_fin`, and the `dt` function of the config; all other
    /// settings (tolerances, algorithm, transient flags) apply as in
    /// [SolverImplicit::solve]. The state is written after every step when the
    /// file generation is enabled.
    pub fn solve_for(
        &mut self,
        state: &mut FemState,
        file_io: &mut FileIo,
        n_steps: usize,
        dt: f64,
    ) -> Result<(), StrError> {
        macro_rules! run {
            ($e:expr) => {
                match $e {
                    Ok(val) => val,
                    Err(err) => {
                        match file_io.write_state(state) {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write state due to: {}", e),
                        }
                        match file_io.write_self() {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write summary due to: {}", e),
                        }
                        return Err(err);
                    }
                }
            };
        }

        let (ignore, triangular) = self.prepare_assembly();
        let mut control = ConvergenceControl::new(self.config, self.linear_system.neq_total);
        control.print_header();

        for timestep in 0..n_steps {
            state.dt = dt;
            run!(self.step_with_retry(state, &mut control, timestep, &ignore, triangular));
            state.commit();
            self.elements.commit_state();
            file_io.write_state(state)?;
        }

        control.print_footer();
        file_io.write_self()
    }

    /// Returns the prescribed-equation mask and the triangular-storage flag
    fn prepare_assembly(&self) -> (Vec<bool>, bool) {
        let ignore = if self.config.lagrange_mult_method {
            vec![false; self.bc_prescribed.flags.len()]
        } else {
            self.bc_prescribed.flags.clone()
        };
        let triangular = self.linear_system.kk.get_info().3.triangular();
        (ignore, triangular)
    }

    /// Attempts one step, halving the step size upon (retryable) failures
    fn step_with_retry(
        &mut self,
        state: &mut FemState,
        control: &mut ConvergenceControl,
        timestep: usize,
        ignore: &[bool],
        triangular: bool,
    ) -> Result<(), StrError> {
        control.reset_failures();
        loop {
            if state.dt < self.config.dt_min {
                return Err("dt is smaller than the allowed minimum");
            }
            state.t += state.dt;
            match self.run_step(state, control, timestep, ignore, triangular) {
                Ok(()) => {
                    control.add_converged();
                    return Ok(());
                }
                Err(err) => {
                    let retryable = err == "Newton-Raphson did not converge"
                        || err == "joint internal equilibrium did not converge";
                    if self.config.divergence_control && retryable {
                        control.add_failed();
                        // roll back to the last committed configuration
                        state.t -= state.dt;
                        state.revert_to_committed();
                        self.elements.revert_to_last_commit();
                        if control.too_many_failures() {
                            return Err(err);
                        }
                        // retry with a halved step
                        state.dt /= 2.0;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Runs the Newton-Raphson iterations of a single load/time step
    fn run_step(
        &mut self,
        state: &mut FemState,
        control: &mut ConvergenceControl,
        timestep: usize,
        ignore: &[bool],
        triangular: bool,
    ) -> Result<(), StrError> {
        let config = self.config;
        let ndof = self.bc_prescribed.flags.len();
        let neq_total = self.linear_system.neq_total;

        // collect the unknown equations
        let unknown_equations: Vec<_> = (0..neq_total).filter(|&eq| eq >= ndof || !ignore[eq]).collect();

        // reset flags and cumulated primary values
        control.reset();
        state.duu.fill(0.0);

        // transient: predictor vectors from the old state
        let transient_vars = if config.transient {
            let vars = TransientVars::new(config, state.dt)?;
            vars.predictors(state);
            Some(vars)
        } else {
            None
        };

        // reduced method: enforce the prescribed values directly
        if !config.lagrange_mult_method {
            self.bc_prescribed.apply(&mut state.duu, &mut state.uu);
        }

        // message
        control.print_timestep(timestep, state.t, state.dt);

        // iteration loop
        for iteration in 0..config.n_max_iterations {
            // run the state determination of all elements with the trial U
            self.elements.update_state(state)?;

            // assemble the internal and external forces
            self.elements
                .assemble_f_int(&mut self.linear_system.ff_int, state, ignore)?;
            self.linear_system.ff_ext.fill(0.0);
            self.bc_concentrated
                .add_to_ff_ext(&mut self.linear_system.ff_ext, (config.load_factor)(state.t));

            // calculate the residual vector R = F_int - F_ext
            vec_add(
                &mut self.linear_system.rr,
                1.0,
                &self.linear_system.ff_int,
                -1.0,
                &self.linear_system.ff_ext,
            )
            .unwrap();

            // transient: add the inertial forces M·A to R
            if let Some(vars) = &transient_vars {
                for eq in 0..ndof {
                    if !ignore[eq] {
                        vars.update_kinematics(state, eq);
                        self.linear_system.rr[eq] += self.linear_system.mass[eq] * state.aa[eq];
                    }
                }
            }

            // add the Lagrange multiplier contributions to R
            if config.lagrange_mult_method {
                for p in 0..self.bc_prescribed.equations.len() {
                    let i = self.bc_prescribed.equations[p];
                    let j = ndof + p;
                    let lambda = state.uu[j];
                    let c = self.bc_prescribed.all[p].value;
                    self.linear_system.rr[i] += lambda; // Aᵀ λ  →  1 · λ
                    self.linear_system.rr[j] = state.uu[i] - c; // A u - c  →  1 · u - c
                }
            }

            // check convergence on the residual
            control.analyze_rr(iteration, &self.linear_system.rr)?;
            if control.converged() {
                control.print_iteration();
                return Ok(());
            }

            // compute the Jacobian matrix
            if iteration == 0 || config.algorithm == Algorithm::NewtonRaphson {
                self.linear_system.kk.reset()?;
                let kk_coo = self.linear_system.kk.get_coo_mut()?;
                self.elements.assemble_kke(kk_coo, state, ignore, triangular)?;

                // transient: effective stiffness K + M / (β Δt²)
                if let Some(vars) = &transient_vars {
                    for eq in 0..ndof {
                        if !ignore[eq] {
                            kk_coo.put(eq, eq, vars.a1 * self.linear_system.mass[eq])?;
                        }
                    }
                }

                // constraint handling
                if config.lagrange_mult_method {
                    // add the Aᵀ and A unit entries
                    for p in 0..self.bc_prescribed.equations.len() {
                        let i = self.bc_prescribed.equations[p];
                        let j = ndof + p;
                        if triangular {
                            kk_coo.put(j, i, 1.0)?; // A (lower triangle)
                        } else {
                            kk_coo.put(i, j, 1.0)?; // Aᵀ
                            kk_coo.put(j, i, 1.0)?; // A
                        }
                    }
                } else {
                    // ones on the diagonal of prescribed equations
                    for eq in &self.bc_prescribed.equations {
                        kk_coo.put(*eq, *eq, 1.0)?;
                    }
                }

                // factorize the global Jacobian matrix
                self.linear_system
                    .solver
                    .actual
                    .factorize(&mut self.linear_system.kk, Some(config.lin_sol_params))?;
            }

            // solve the linear system K mdu = R
            self.linear_system.solver.actual.solve(
                &mut self.linear_system.mdu,
                &self.linear_system.kk,
                &self.linear_system.rr,
                false,
            )?;

            // check convergence on the corrective displacement
            control.analyze_mdu(iteration, &self.linear_system.mdu, &self.linear_system.rr)?;
            control.print_iteration();
            if control.converged() {
                return Ok(());
            }

            // update the trial U (and ΔU) vectors
            for i in &unknown_equations {
                state.uu[*i] -= self.linear_system.mdu[*i];
                state.duu[*i] -= self.linear_system.mdu[*i];
            }
            if let Some(vars) = &transient_vars {
                for eq in 0..ndof {
                    if !ignore[eq] {
                        vars.update_kinematics(state, eq);
                    }
                }
            }

            // exit if linear problem
            if config.linear_problem {
                self.elements.update_state(state)?;
                control.set_converged_linear_problem();
                return Ok(());
            }

            // check the iteration budget
            if let Status::Failed = control.status(iteration) {
                return Err("Newton-Raphson did not converge");
            }
        }
        Err("Newton-Raphson did not converge")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
