//! Implements the base structures for a structural simulation

mod assemble;
mod config;
mod dof;
mod enums;
mod equations;
mod essential;
mod model;
mod natural;
mod parameters;
mod sample_models;
pub use crate::base::assemble::*;
pub use crate::base::config::*;
pub use crate::base::dof::*;
pub use crate::base::enums::*;
pub use crate::base::equations::*;
pub use crate::base::essential::*;
pub use crate::base::model::*;
pub use crate::base::natural::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_models::*;
