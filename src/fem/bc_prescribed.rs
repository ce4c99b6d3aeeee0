use super::FemBase;
use crate::base::Essential;
use crate::StrError;
use russell_lab::Vector;

/// Holds one prescribed (essential) value at a global equation
pub struct BcPrescribed {
    /// Global equation number
    pub eq: usize,

    /// Prescribed target value
    pub value: f64,
}

/// Holds all prescribed (essential) boundary conditions of a model
///
/// The entries are sorted by equation number, so the Lagrange multiplier
/// equations appended by the solver get a deterministic ordering.
pub struct BcPrescribedArray {
    /// All prescribed values, sorted by equation number
    pub all: Vec<BcPrescribed>,

    /// Flags the prescribed equations (n_equation)
    pub flags: Vec<bool>,

    /// The prescribed equation numbers, sorted
    pub equations: Vec<usize>,
}

impl BcPrescribedArray {
    /// Allocates a new instance
    pub fn new(base: &FemBase, essential: &Essential) -> Result<Self, StrError> {
        let mut all = Vec::with_capacity(essential.all.len());
        for ((point_id, dof), value) in &essential.all {
            let eq = base.equations.eq(*point_id, *dof)?;
            all.push(BcPrescribed { eq, value: *value });
        }
        all.sort_by(|a, b| a.eq.cmp(&b.eq));
        let mut flags = vec![false; base.equations.n_equation];
        let mut equations = Vec::with_capacity(all.len());
        for bc in &all {
            if flags[bc.eq] {
                return Err("prescribed displacement is set twice at the same DOF");
            }
            flags[bc.eq] = true;
            equations.push(bc.eq);
        }
        Ok(BcPrescribedArray { all, flags, equations })
    }

    /// Returns whether any prescribed value is non-zero
    pub fn has_non_zero(&self) -> bool {
        self.all.iter().any(|bc| bc.value != 0.0)
    }

    /// Writes the prescribed values into the trial displacement vector
    ///
    /// Only used by the reduced-system method, where the targets are enforced
    /// directly (the Lagrange method enforces them through extra equations).
    pub fn apply(&self, duu: &mut Vector, uu: &mut Vector) {
        for bc in &self.all {
            duu[bc.eq] = bc.value - uu[bc.eq];
            uu[bc.eq] = bc.value;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
