use super::{Condensation, ElementTrait, FemState};
use crate::base::{compute_local_to_global, Member, Model, ParamJoint, JOINT_NSPRING, JOINT_PANEL_SPRING};
use crate::fem::FemBase;
use crate::material::{allocate_uniaxial, UniaxialTrait};
use crate::StrError;
use russell_lab::{solve_lin_sys, vec_copy, vec_norm, Matrix, Norm, Vector};

/// Number of external equations (4 nodes × 3 DOFs)
const N_EXT: usize = 12;

/// Number of internal DOFs (panel translations, rotation, shear distortion)
const N_INT: usize = 4;

/// Total number of local equations
const N_TOT: usize = N_EXT + N_INT;

/// Cumulative cap on inner iterations per state determination
const MAX_TOTAL_ITERATIONS: usize = 1000;

/// Inner Newton iteration limits (without / with line search)
const INNER_ITERATIONS: usize = 20;
const INNER_ITERATIONS_LS: usize = 25;

/// Sub-step growth/shrink factors
const STEP_GROWTH: f64 = 10.0;
const STEP_SHRINK: f64 = 0.1;
const STEP_MIN: f64 = 1e-12;

/// Line search parameters
const LS_RATIO: f64 = 0.8;
const LS_MAX_ETA: f64 = 10.0;
const LS_MAX_BISECTION: usize = 20;

/// Internal convergence tolerances
const TOL_FORCE_ABS: f64 = 1e-10;
const TOL_FORCE_REL: f64 = 1e-12;
const TOL_ENERGY_ABS: f64 = 1e-18;
const TOL_DQ_ABS: f64 = 1e-14;

/// Implements the panel-zone joint element
///
/// Four external nodes sit at the mid-edges of a rectangular panel
/// (left, bottom, right, top), each with (ux, uy, rz). Four internal DOFs
/// q = (panel ux, panel uy, panel rotation, shear distortion γ) describe the
/// panel configuration. Thirteen uniaxial springs connect the two: per face
/// {axial, tangential, rotational} plus one spring resisting γ.
///
/// The constant kinematic matrix A (13 × 16) maps [u_ext; q] to spring
/// deformations. The state determination solves the internal equilibrium
/// g(q) = Bᵀ f = 0 (B = internal columns of A) with a nested Newton scheme:
/// adaptive sub-stepping of the external displacement increment, a
/// directional-derivative line search, and a cumulative iteration budget.
/// On success, the 16 × 16 tangent Aᵀ·diag(k)·A and the force Aᵀ·f are
/// statically condensed onto the 12 external equations.
pub struct ElementJoint {
    /// Local-to-global mapping (12 equations)
    local_to_global: Vec<usize>,

    /// The 13 springs
    springs: Vec<Box<dyn UniaxialTrait>>,

    /// Constant kinematic matrix (13 × 16); internal columns last
    aa: Matrix,

    /// Trial external displacements (the target of the last update)
    u_ext: Vector,

    /// Trial internal DOFs
    q: Vector,

    /// Committed external displacements
    u_ext_old: Vector,

    /// Committed internal DOFs
    q_old: Vector,

    /// Condensed tangent (12 × 12)
    kk_cond: Matrix,

    /// Condensed resisting force (12)
    ff_cond: Vector,

    /// Internal vector at which the springs were last evaluated
    q_eval: Vector,

    /// Spring forces and tangents at the last evaluation
    force: Vector,
    stiff: Vector,

    /// Internal residual g = Bᵀ f (4)
    gg: Vector,

    /// Internal Jacobian Bᵀ·diag(k)·B (4 × 4); destroyed by the dense solve
    jj: Matrix,

    /// Newton correction (4)
    dq: Vector,

    /// Last accepted internal DOFs during sub-stepping
    q_accepted: Vector,

    /// Full local system before condensation
    kk_full: Matrix,
    ff_full: Vector,

    condensation: Condensation,

    /// Diagnostics of the last state determination
    pub(crate) n_total_iterations: usize,
    pub(crate) load_step_sum: f64,
    pub(crate) used_line_search: bool,
}

impl ElementJoint {
    /// Allocates a new instance
    pub fn new(model: &Model, base: &FemBase, member: &Member, param: &ParamJoint) -> Result<Self, StrError> {
        let local_to_global = compute_local_to_global(&base.attributes, &base.equations, member)?;

        // panel geometry from the mid-edge nodes (left, bottom, right, top)
        let (il, ib, ir, it) = (
            member.points[0],
            member.points[1],
            member.points[2],
            member.points[3],
        );
        let width = model.nodes[ir].coords[0] - model.nodes[il].coords[0];
        let height = model.nodes[it].coords[1] - model.nodes[ib].coords[1];
        if width <= 0.0 || height <= 0.0 {
            return Err("joint panel must have positive width and height");
        }

        // face centers, normals, and tangents
        let (w2, h2) = (width / 2.0, height / 2.0);
        #[rustfmt::skip]
        let faces: [([f64; 2], [f64; 2], [f64; 2]); 4] = [
            ([-w2, 0.0], [-1.0,  0.0], [ 0.0, -1.0]), // left
            ([0.0, -h2], [ 0.0, -1.0], [ 1.0,  0.0]), // bottom
            ([ w2, 0.0], [ 1.0,  0.0], [ 0.0,  1.0]), // right
            ([0.0,  h2], [ 0.0,  1.0], [-1.0,  0.0]), // top
        ];

        // kinematic matrix: deformation = A · [u_ext; q]
        // panel field: u(r) = up - θp·ry + (γ/2)·ry ; v(r) = vp + θp·rx + (γ/2)·rx
        let mut aa = Matrix::new(JOINT_NSPRING, N_TOT);
        for (f, (r, n, t)) in faces.iter().enumerate() {
            let (rx, ry) = (r[0], r[1]);
            for (k, dir) in [n, t].iter().enumerate() {
                let row = 3 * f + k;
                let (dx, dy) = (dir[0], dir[1]);
                aa.set(row, 3 * f, dx);
                aa.set(row, 3 * f + 1, dy);
                aa.set(row, N_EXT, -dx);
                aa.set(row, N_EXT + 1, -dy);
                aa.set(row, N_EXT + 2, ry * dx - rx * dy);
                aa.set(row, N_EXT + 3, -(ry * dx + rx * dy) / 2.0);
            }
            aa.set(3 * f + 2, 3 * f + 2, 1.0);
            aa.set(3 * f + 2, N_EXT + 2, -1.0);
        }
        aa.set(JOINT_PANEL_SPRING, N_EXT + 3, 1.0);

        // springs
        let mut springs = Vec::with_capacity(JOINT_NSPRING);
        for p in &param.springs {
            springs.push(allocate_uniaxial(p)?);
        }

        Ok(ElementJoint {
            local_to_global,
            springs,
            aa,
            u_ext: Vector::new(N_EXT),
            q: Vector::new(N_INT),
            u_ext_old: Vector::new(N_EXT),
            q_old: Vector::new(N_INT),
            kk_cond: Matrix::new(N_EXT, N_EXT),
            ff_cond: Vector::new(N_EXT),
            q_eval: Vector::new(N_INT),
            force: Vector::new(JOINT_NSPRING),
            stiff: Vector::new(JOINT_NSPRING),
            gg: Vector::new(N_INT),
            jj: Matrix::new(N_INT, N_INT),
            dq: Vector::new(N_INT),
            q_accepted: Vector::new(N_INT),
            kk_full: Matrix::new(N_TOT, N_TOT),
            ff_full: Vector::new(N_TOT),
            condensation: Condensation::new(N_EXT, N_INT),
            n_total_iterations: 0,
            load_step_sum: 0.0,
            used_line_search: false,
        })
    }

    /// Evaluates all springs at the given load fraction and at `q_eval`
    ///
    /// The external displacement is interpolated between the committed value
    /// and the trial target: u(s) = u_old + s·(u_trial − u_old).
    fn eval_springs(&mut self, s: f64) {
        for row in 0..JOINT_NSPRING {
            let mut defo = 0.0;
            for l in 0..N_EXT {
                let u = self.u_ext_old[l] + s * (self.u_ext[l] - self.u_ext_old[l]);
                defo += self.aa.get(row, l) * u;
            }
            for j in 0..N_INT {
                defo += self.aa.get(row, N_EXT + j) * self.q_eval[j];
            }
            self.springs[row].set_trial_strain(defo);
            self.force[row] = self.springs[row].stress();
            self.stiff[row] = self.springs[row].tangent();
        }
    }

    /// Computes the internal residual g = Bᵀ f at the last evaluation
    fn calc_g(&mut self) {
        for j in 0..N_INT {
            let mut sum = 0.0;
            for row in 0..JOINT_NSPRING {
                sum += self.aa.get(row, N_EXT + j) * self.force[row];
            }
            self.gg[j] = sum;
        }
    }

    /// Computes the directional derivative s(η) = g(q + η·Δq)·Δq
    fn slope_at(&mut self, s: f64, eta: f64) -> f64 {
        for j in 0..N_INT {
            self.q_eval[j] = self.q[j] + eta * self.dq[j];
        }
        self.eval_springs(s);
        let mut slope = 0.0;
        for row in 0..JOINT_NSPRING {
            let mut b_dq = 0.0;
            for j in 0..N_INT {
                b_dq += self.aa.get(row, N_EXT + j) * self.dq[j];
            }
            slope += self.force[row] * b_dq;
        }
        slope
    }

    /// Searches the step length η along Δq
    ///
    /// Accepts η = 1 when |s(1)| ≤ 0.8·|s(0)|; otherwise brackets a sign
    /// change by doubling η up to 10 and bisects (≤ 20 iterations). Falls
    /// back to η = 1 when no bracket exists.
    fn line_search(&mut self, s: f64) -> f64 {
        let mut s_a = 0.0;
        for j in 0..N_INT {
            s_a += self.gg[j] * self.dq[j];
        }
        let s0_abs = f64::abs(s_a);
        let mut s_b = self.slope_at(s, 1.0);
        if f64::abs(s_b) <= LS_RATIO * s0_abs {
            return 1.0;
        }
        let mut eta_a = 0.0;
        let mut eta_b = 1.0;
        while s_a * s_b > 0.0 && eta_b < LS_MAX_ETA {
            eta_b = f64::min(2.0 * eta_b, LS_MAX_ETA);
            s_b = self.slope_at(s, eta_b);
        }
        if s_a * s_b > 0.0 {
            return 1.0; // no bracket found
        }
        let mut eta_m = 0.5 * (eta_a + eta_b);
        for _ in 0..LS_MAX_BISECTION {
            eta_m = 0.5 * (eta_a + eta_b);
            let s_m = self.slope_at(s, eta_m);
            if f64::abs(s_m) <= LS_RATIO * s0_abs {
                return eta_m;
            }
            if s_a * s_m < 0.0 {
                eta_b = eta_m;
            } else {
                eta_a = eta_m;
                s_a = s_m;
            }
        }
        eta_m
    }

    /// Runs the inner Newton iterations for one sub-step
    ///
    /// Returns Ok(true) on convergence, Ok(false) when the iteration budget
    /// of the sub-step is exhausted, and Err on a singular internal Jacobian.
    fn solve_internal(&mut self, s: f64, with_line_search: bool) -> Result<bool, StrError> {
        let max_iter = if with_line_search {
            INNER_ITERATIONS_LS
        } else {
            INNER_ITERATIONS
        };
        let mut norm_g0 = 0.0;
        for it in 0..max_iter {
            if self.n_total_iterations >= MAX_TOTAL_ITERATIONS {
                return Ok(false);
            }
            self.n_total_iterations += 1;

            // residual
            vec_copy(&mut self.q_eval, &self.q).unwrap();
            self.eval_springs(s);
            self.calc_g();
            let norm_g = vec_norm(&self.gg, Norm::Euc);
            if !norm_g.is_finite() {
                return Err("found NaN or Inf in the joint internal residual");
            }
            if it == 0 {
                norm_g0 = norm_g;
            }
            if norm_g < TOL_FORCE_ABS || norm_g < TOL_FORCE_REL * norm_g0 {
                return Ok(true);
            }

            // Jacobian J = Bᵀ·diag(k)·B and correction J·Δq = -g
            for a in 0..N_INT {
                for b in 0..N_INT {
                    let mut sum = 0.0;
                    for row in 0..JOINT_NSPRING {
                        sum += self.stiff[row] * self.aa.get(row, N_EXT + a) * self.aa.get(row, N_EXT + b);
                    }
                    self.jj.set(a, b, sum);
                }
            }
            for j in 0..N_INT {
                self.dq[j] = -self.gg[j];
            }
            solve_lin_sys(&mut self.dq, &mut self.jj)?;

            // energy and correction-size acceptance
            let mut energy = 0.0;
            for j in 0..N_INT {
                energy += self.gg[j] * self.dq[j];
            }
            if self.n_total_iterations > 1 && f64::abs(energy) < TOL_ENERGY_ABS {
                return Ok(true);
            }
            if it > 0 && vec_norm(&self.dq, Norm::Euc) < TOL_DQ_ABS {
                return Ok(true);
            }

            // advance
            let eta = if with_line_search { self.line_search(s) } else { 1.0 };
            for j in 0..N_INT {
                self.q[j] += eta * self.dq[j];
            }
        }
        Ok(false)
    }
}

impl ElementTrait for ElementJoint {
    fn symmetric_jacobian(&self) -> bool {
        true
    }

    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    /// Solves the internal equilibrium for the trial displacements and
    /// stores the condensed tangent and resisting force
    fn update_state(&mut self, state: &FemState) -> Result<(), StrError> {
        // gather trial external displacements
        for l in 0..N_EXT {
            self.u_ext[l] = state.uu[self.local_to_global[l]];
        }

        // sub-stepping over the external displacement increment
        self.n_total_iterations = 0;
        self.load_step_sum = 0.0;
        self.used_line_search = false;
        vec_copy(&mut self.q, &self.q_old).unwrap();
        vec_copy(&mut self.q_accepted, &self.q_old).unwrap();
        let mut load_step = 0.0;
        let mut d_load_step = 1.0_f64;
        let mut n_success_in_row = 0;
        let mut with_line_search = false;
        while load_step < 1.0 {
            if d_load_step > 1.0 - load_step {
                d_load_step = 1.0 - load_step;
            }
            let target = load_step + d_load_step;
            if self.solve_internal(target, with_line_search)? {
                load_step = target;
                self.load_step_sum += d_load_step;
                vec_copy(&mut self.q_accepted, &self.q).unwrap();
                n_success_in_row += 1;
                if n_success_in_row >= 2 {
                    d_load_step *= STEP_GROWTH;
                    n_success_in_row = 0;
                }
            } else {
                vec_copy(&mut self.q, &self.q_accepted).unwrap();
                n_success_in_row = 0;
                if !with_line_search {
                    // first remedy: enable the line search
                    with_line_search = true;
                    self.used_line_search = true;
                } else {
                    // second remedy: shrink the sub-step
                    d_load_step *= STEP_SHRINK;
                }
                if d_load_step < STEP_MIN || self.n_total_iterations >= MAX_TOTAL_ITERATIONS {
                    return Err("joint internal equilibrium did not converge");
                }
            }
        }

        // full local system at the converged configuration
        vec_copy(&mut self.q_eval, &self.q).unwrap();
        self.eval_springs(1.0);
        for i in 0..N_TOT {
            let mut fi = 0.0;
            for row in 0..JOINT_NSPRING {
                fi += self.aa.get(row, i) * self.force[row];
            }
            self.ff_full[i] = fi;
            for j in 0..N_TOT {
                let mut sum = 0.0;
                for row in 0..JOINT_NSPRING {
                    sum += self.stiff[row] * self.aa.get(row, i) * self.aa.get(row, j);
                }
                self.kk_full.set(i, j, sum);
            }
        }

        // condense onto the external equations
        self.condensation
            .condense(&mut self.kk_cond, &mut self.ff_cond, &self.kk_full, &self.ff_full)
    }

    fn calc_residual(&mut self, residual: &mut Vector, _state: &FemState) -> Result<(), StrError> {
        vec_copy(residual, &self.ff_cond)
    }

    fn calc_jacobian(&mut self, jacobian: &mut Matrix, _state: &FemState) -> Result<(), StrError> {
        for i in 0..N_EXT {
            for j in 0..N_EXT {
                jacobian.set(i, j, self.kk_cond.get(i, j));
            }
        }
        Ok(())
    }

    fn add_to_mass(&self, _mass: &mut Vector) -> Result<(), StrError> {
        Ok(()) // massless
    }

    fn commit_state(&mut self) {
        for spring in &mut self.springs {
            spring.commit_state();
        }
        vec_copy(&mut self.u_ext_old, &self.u_ext).unwrap();
        vec_copy(&mut self.q_old, &self.q).unwrap();
    }

    fn revert_to_last_commit(&mut self) {
        for spring in &mut self.springs {
            spring.revert_to_last_commit();
        }
        vec_copy(&mut self.u_ext, &self.u_ext_old).unwrap();
        vec_copy(&mut self.q, &self.q_old).unwrap();
    }

    fn revert_to_start(&mut self) {
        for spring in &mut self.springs {
            spring.revert_to_start();
        }
        self.u_ext.fill(0.0);
        self.q.fill(0.0);
        self.u_ext_old.fill(0.0);
        self.q_old.fill(0.0);
        self.kk_cond.fill(0.0);
        self.ff_cond.fill(0.0);
        self.n_total_iterations = 0;
        self.load_step_sum = 0.0;
        self.used_line_search = false;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
