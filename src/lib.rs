//! Strucsim - nonlinear structural frame analysis
//!
//! This crate implements the implicit (Newton-Raphson) solution procedures for
//! the static and transient analysis of frame structures. The element catalog
//! contains trusses, Euler-Bernoulli beams, and a force-based panel-zone joint
//! element whose state determination runs a nested Newton iteration with line
//! search and adaptive load sub-stepping.
//!
//! The code is organized in three layers:
//!
//! * [base] -- model definition (nodes, members, attributes), degrees of
//!   freedom and equation numbers, boundary conditions, and configuration
//! * [material] -- uniaxial material points with trial/committed state
//! * [fem] -- elements, the global linear system, convergence control, the
//!   implicit solver, and the solution-procedure orchestration

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;

/// Collects the most frequently used definitions
pub mod prelude {
    pub use crate::base::{
        Algorithm, Attributes, Config, Dof, Elem, Essential, Member, Model, Natural, Node, Numberer, ParamBeam,
        ParamJoint, ParamTruss, ParamUniaxial, Pbc, SampleModels,
    };
    pub use crate::fem::{
        Analysis, ConvergenceControl, ElementTrait, Elements, FemBase, FemState, FileIo, Orchestrator, SolverImplicit,
        Status,
    };
    pub use crate::material::{allocate_uniaxial, UniaxialTrait};
}
