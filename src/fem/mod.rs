//! Implements the finite element method: elements, solvers, and orchestration

mod analysis;
mod bc_concentrated;
mod bc_prescribed;
mod condensation;
mod control_convergence;
mod element_beam;
mod element_joint;
mod element_trait;
mod element_truss;
mod elements;
mod file_io;
mod fembase;
mod linear_system;
mod orchestrator;
mod solver_implicit;
mod state;
mod transient;
pub use crate::fem::analysis::*;
pub use crate::fem::bc_concentrated::*;
pub use crate::fem::bc_prescribed::*;
pub use crate::fem::condensation::*;
pub use crate::fem::control_convergence::*;
pub use crate::fem::element_beam::*;
pub use crate::fem::element_joint::*;
pub use crate::fem::element_trait::*;
pub use crate::fem::element_truss::*;
pub use crate::fem::elements::*;
pub use crate::fem::file_io::*;
pub use crate::fem::fembase::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::orchestrator::*;
pub use crate::fem::solver_implicit::*;
pub use crate::fem::state::*;
pub use crate::fem::transient::*;
