use super::{BcPrescribedArray, Elements, FemBase};
use crate::base::Config;
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{LinSolver, SparseMatrix};

/// Holds variables to solve the global linear system
///
/// Covers both constraint-handling methods: the reduced-system method puts
/// ones on the diagonal of prescribed equations, whereas the Lagrange
/// multiplier method appends one extra equation per prescribed value.
pub struct LinearSystem<'a> {
    /// Total number of global equations (DOFs plus Lagrange multipliers)
    pub neq_total: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// **Notes:**
    ///
    /// 1. The local element matrices add only to parts of the global matrix yielding a banded matrix
    /// 2. The elements share DOFs; therefore, the exact nnz is (much) less than nrow × ncol
    /// 3. The supremum is the sum of all entries in the local matrices, plus the unit entries
    ///    of the constraint-handling method, plus the diagonal mass entries in transient analyses
    pub nnz_sup: usize,

    /// Holds the internal (resisting) force vector
    pub ff_int: Vector,

    /// Holds the external force vector
    pub ff_ext: Vector,

    /// Holds the residual vector R = F_int - F_ext
    pub rr: Vector,

    /// Holds the global Jacobian matrix K
    pub kk: SparseMatrix,

    /// Holds the lumped (diagonal) mass vector (transient analyses only)
    pub mass: Vector,

    /// Holds the "minus-delta-U" vector (the solution of the linear system)
    pub mdu: Vector,

    /// Holds the linear solver
    pub solver: LinSolver<'a>,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    pub fn new(
        base: &FemBase,
        config: &Config,
        prescribed: &BcPrescribedArray,
        elements: &Elements,
    ) -> Result<Self, StrError> {
        // equation (DOF) numbers
        let n_equation = base.equations.n_equation;
        let n_lagrange = if config.lagrange_mult_method {
            prescribed.all.len()
        } else {
            0
        };
        let neq_total = n_equation + n_lagrange;

        // check if all Jacobian matrices are symmetric
        let symmetric = if config.ignore_jacobian_symmetry {
            false
        } else {
            elements.all_symmetric_jacobians()
        };

        // estimate the number of non-zero values
        let sym = config.lin_sol_genie.get_sym(symmetric);
        let mut nnz_sup = elements.all.iter().fold(0, |acc, e| {
            let n = e.actual.local_to_global().len();
            if sym.triangular() {
                acc + (n * n + n) / 2
            } else {
                acc + n * n
            }
        });
        if config.lagrange_mult_method {
            // unit entries of the constraint equations
            nnz_sup += if sym.triangular() { n_lagrange } else { 2 * n_lagrange };
        } else {
            // ones on the diagonal of prescribed equations
            nnz_sup += prescribed.all.len();
        }
        if config.transient {
            // diagonal mass entries of the effective stiffness
            nnz_sup += n_equation;
        }

        // allocate new instance
        let mass = if config.transient {
            let mut mass = Vector::new(n_equation);
            elements.add_to_mass(&mut mass)?;
            mass
        } else {
            Vector::new(0)
        };
        Ok(LinearSystem {
            neq_total,
            nnz_sup,
            ff_int: Vector::new(neq_total),
            ff_ext: Vector::new(neq_total),
            rr: Vector::new(neq_total),
            kk: SparseMatrix::new_coo(neq_total, neq_total, nnz_sup, sym)?,
            mass,
            mdu: Vector::new(neq_total),
            solver: LinSolver::new(config.lin_sol_genie)?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
