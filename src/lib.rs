//! Discrete factor graphs and exact inference by enumeration of the joint state space.

#[cfg_attr(test, macro_use)]
extern crate itertools;
#[cfg_attr(test, macro_use)]
extern crate ndarray;

pub mod variable;
pub mod varset;
pub mod index;
pub mod factor;
pub mod init;
pub mod model;
pub mod properties;
pub mod inference;
pub mod util;

pub use util::{Result, JointlyError};
pub use variable::{Assignment, Variable};
pub use varset::VarSet;
pub use index::{all_assignments, IndexFor};
pub use factor::{Factor, Table, Values};
pub use init::Initialization;
pub use model::{FactorGraph, FactorGraphBuilder};
pub use properties::{Properties, PropertySet};
pub use inference::{EngineState, ExactInf, InferenceAlgorithm};
