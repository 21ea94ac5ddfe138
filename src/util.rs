//! Defines the `Error` type for the jointly library

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, JointlyError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum JointlyError {

    /// An option set contained an unrecognized key, or a value that could not be interpreted
    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    /// A linear index, state, variable or position fell outside the range it indexes into
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// The operation only makes sense for iterative algorithms
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("Missing assignments to the required Variables")]
    IncompleteAssignment,

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("Provided scope did not satisfy constraints: {0}")]
    InvalidScope(String),

    /// A `Variable` must have at least one state
    #[error("A variable must have at least one state")]
    InvalidCardinality,

    /// The same label was used for two `Variable`s of different cardinality
    #[error("Variable x{0} was encountered with conflicting cardinalities")]
    DuplicateVariable(usize),

    /// Factor tables hold non-negative potentials only
    #[error("Encountered a negative factor value")]
    NegativeValue,

    /// Factor tables hold finite potentials only
    #[error("Encountered a NaN or infinite factor value")]
    NonFiniteValue,

    /// The joint state space does not fit in a `usize`
    #[error("Joint state space of {0} variables overflows usize")]
    StateSpaceOverflow(usize),

}
