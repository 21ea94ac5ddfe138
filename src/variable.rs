//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a factor graph. It is identified by its
//! label alone; the number of states travels with it so that tables can be sized without a
//! lookup.

use crate::util::{JointlyError, Result};

use indexmap::IndexMap;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug)]
pub struct Variable {
    /// Unique label of the `Variable`. Two `Variable`s are equal iff their labels are equal.
    label: usize,

    /// The number of states (cardinality) of the `Variable`
    states: usize
}

impl Variable {

    /// Construct a new `Variable` with the given label and number of states
    ///
    /// # Errors
    /// * `JointlyError::InvalidCardinality` if `states` is zero
    pub fn new(label: usize, states: usize) -> Result<Variable> {
        if states == 0 {
            return Err(JointlyError::InvalidCardinality);
        }

        Ok(Variable { label, states })
    }

    /// Construct a new binary `Variable`
    pub fn binary(label: usize) -> Variable {
        Variable { label, states: 2 }
    }

    /// The label of this `Variable`
    pub fn label(&self) -> usize {
        self.label
    }

    /// The number of states of this `Variable`
    pub fn cardinality(&self) -> usize {
        self.states
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.label == other.label
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Variable) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Variable) -> Ordering {
        self.label.cmp(&other.label)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.label)
    }
}


/// A (possibly partial) assignment of states to `Variable`s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: IndexMap<Variable, usize>
}

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign `state` to `var`, replacing any earlier assignment
    pub fn set(&mut self, var: &Variable, state: usize) {
        self.values.insert(*var, state);
    }

    /// Builder style variant of `set`
    pub fn with(mut self, var: &Variable, state: usize) -> Self {
        self.set(var, state);
        self
    }

    /// The state assigned to `var`, if any
    pub fn get(&self, var: &Variable) -> Option<&usize> {
        self.values.get(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the `(Variable, state)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &usize)> {
        self.values.iter()
    }
}
