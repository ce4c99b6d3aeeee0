use super::Dof;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the point boundary condition (concentrated load)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Pbc {
    /// Concentrated force parallel to x
    Fx(f64),

    /// Concentrated force parallel to y
    Fy(f64),

    /// Concentrated moment around the z axis
    Mz(f64),
}

impl Pbc {
    /// Returns the DOF corresponding to the concentrated load
    pub fn dof(&self) -> Dof {
        match self {
            Pbc::Fx(..) => Dof::Ux,
            Pbc::Fy(..) => Dof::Uy,
            Pbc::Mz(..) => Dof::Rz,
        }
    }

    /// Returns the reference value of the load (before the load factor is applied)
    pub fn value(&self) -> f64 {
        match self {
            Pbc::Fx(v) => *v,
            Pbc::Fy(v) => *v,
            Pbc::Mz(v) => *v,
        }
    }
}

impl fmt::Display for Pbc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pbc::Fx(v) => write!(f, "Fx = {:?}", v),
            Pbc::Fy(v) => write!(f, "Fy = {:?}", v),
            Pbc::Mz(v) => write!(f, "Mz = {:?}", v),
        }
    }
}

/// Defines the nonlinear solution algorithm at the structure level
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Algorithm {
    /// Full Newton-Raphson: the tangent is recomputed and factorized at every iteration
    NewtonRaphson,

    /// Modified Newton: the tangent of the first iteration is reused within the step
    ModifiedNewton,
}

/// Defines the DOF numbering strategy
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Numberer {
    /// Equations follow the node ordering
    Plain,

    /// Equations follow the reversed node ordering
    Reversed,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
