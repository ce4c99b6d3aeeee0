use super::{FemBase, FemState, FileIo, LinearSystem, SolverImplicit};
use crate::base::{Attributes, Config, Essential, Model, Natural};
use crate::StrError;

/// Wires a model, boundary conditions, and a solution scheme into a runnable analysis
///
/// The analysis owns the trial/committed state and the solver (elements with
/// their material history included), so successive [Analysis::analyze] calls
/// continue from the last committed configuration. The DOF numbering follows
/// the scheme's `numberer`.
pub struct Analysis<'a> {
    /// Configuration (the solution scheme)
    config: &'a Config,

    /// Attributes and DOF numbers (numbered per the scheme's numberer)
    pub base: FemBase,

    /// Essential boundary conditions
    essential: &'a Essential,

    /// The solver with elements, boundary conditions, and the linear system
    pub solver: SolverImplicit<'a>,

    /// The simulation state
    pub state: FemState,

    /// Output file generation (disabled by default)
    pub file_io: FileIo,
}

impl<'a> Analysis<'a> {
    /// Allocates a new instance
    pub fn new(
        model: &Model,
        attributes: Attributes,
        config: &'a Config,
        essential: &'a Essential,
        natural: &'a Natural,
    ) -> Result<Self, StrError> {
        model.validate()?;
        let base = FemBase::new(model, attributes, config.numberer)?;
        let solver = SolverImplicit::new(model, &base, config, essential, natural)?;
        let state = FemState::new(&base, essential, config)?;
        Ok(Analysis {
            config,
            base,
            essential,
            solver,
            state,
            file_io: FileIo::new(),
        })
    }

    /// Activates the generation of output files
    pub fn enable_output(&mut self, model: &Model, filename_stem: &str, output_dir: Option<&str>) -> Result<(), StrError> {
        self.file_io = FileIo::new_enabled(model, &self.base, filename_stem, output_dir)?;
        Ok(())
    }

    /// Runs a fixed number of load/time steps with a fixed step size
    pub fn analyze(&mut self, n_steps: usize, dt: f64) -> Result<(), StrError> {
        self.solver.solve_for(&mut self.state, &mut self.file_io, n_steps, dt)
    }

    /// Runs the time loop driven by the config (t_ini, t_fin, dt function)
    pub fn run(&mut self) -> Result<(), StrError> {
        self.solver.solve(&mut self.state, &mut self.file_io)
    }

    /// Activates or deactivates an element by member id
    pub fn set_active(&mut self, member_id: usize, active: bool) -> Result<(), StrError> {
        self.solver.elements.set_active(member_id, active)
    }

    /// Re-allocates the linear system (and the state, if its size changed)
    ///
    /// Call after changing element activation so the sparsity estimate and the
    /// symmetry detection reflect the new configuration. The element history
    /// is preserved; the state vectors are preserved unless the number of
    /// equations changed.
    pub fn domain_changed(&mut self) -> Result<(), StrError> {
        self.solver.linear_system =
            LinearSystem::new(&self.base, self.config, &self.solver.bc_prescribed, &self.solver.elements)?;
        if self.solver.linear_system.neq_total != self.state.uu.dim() {
            self.state = FemState::new(&self.base, self.essential, self.config)?;
        }
        Ok(())
    }

    /// Zeroes the trial and committed state and all element/material history
    pub fn revert_to_start(&mut self) {
        self.state.reset(self.config);
        self.solver.elements.revert_to_start();
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
