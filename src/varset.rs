//! Definition of the `VarSet`, a set of `Variable`s kept in canonical (ascending label) order.
//!
//! The order of a `VarSet` defines the linear index of every joint state of its `Variable`s:
//! the index is mixed radix, with the lowest labelled `Variable` varying fastest. Every table
//! in this crate is laid out according to this encoding, so two `VarSet`s holding the same
//! `Variable`s are always index compatible.

use crate::util::{JointlyError, Result};
use crate::variable::{Assignment, Variable};

use itertools::Itertools;

use std::fmt;
use std::iter::FromIterator;
use std::slice;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VarSet {
    /// Sorted by label, no duplicates
    vars: Vec<Variable>
}

impl VarSet {

    /// The empty `VarSet`
    pub fn new() -> Self {
        VarSet { vars: Vec::new() }
    }

    /// Build a `VarSet` from `Variable`s given in any order. Duplicates are dropped.
    pub fn from_vars(vars: &[Variable]) -> Self {
        vars.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over the `Variable`s in canonical order
    pub fn iter(&self) -> slice::Iter<Variable> {
        self.vars.iter()
    }

    /// The `Variable`s in canonical order
    pub fn as_slice(&self) -> &[Variable] {
        &self.vars
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.vars.binary_search(var).is_ok()
    }

    /// Position of `var` in the canonical order
    pub fn position(&self, var: &Variable) -> Option<usize> {
        self.vars.binary_search(var).ok()
    }

    pub fn is_subset_of(&self, other: &VarSet) -> bool {
        self.vars.iter().all(|v| other.contains(v))
    }

    /// The first `Variable` of `self` whose label is also in `other` with a different cardinality
    pub fn conflict(&self, other: &VarSet) -> Option<Variable> {
        self.vars.iter()
                 .find(|v| {
                     other.position(v)
                          .map_or(false, |i| other.vars[i].cardinality() != v.cardinality())
                 })
                 .cloned()
    }

    pub fn union(&self, other: &VarSet) -> VarSet {
        let vars = self.vars.iter()
                            .merge(other.vars.iter())
                            .dedup()
                            .cloned()
                            .collect();
        VarSet { vars }
    }

    pub fn intersection(&self, other: &VarSet) -> VarSet {
        let vars = self.vars.iter().filter(|v| other.contains(v)).cloned().collect();
        VarSet { vars }
    }

    pub fn difference(&self, other: &VarSet) -> VarSet {
        let vars = self.vars.iter().filter(|v| ! other.contains(v)).cloned().collect();
        VarSet { vars }
    }

    /// The number of joint states of the `Variable`s in this set, i.e. the product of their
    /// cardinalities. The empty set has exactly one state.
    ///
    /// The product is not checked for overflow; see `checked_nr_states`.
    pub fn nr_states(&self) -> usize {
        self.vars.iter().map(|v| v.cardinality()).product()
    }

    /// `nr_states`, or `None` if the product does not fit in a `usize`
    pub fn checked_nr_states(&self) -> Option<usize> {
        self.vars.iter().try_fold(1usize, |acc, v| acc.checked_mul(v.cardinality()))
    }

    /// Compute the linear index of a joint state.
    ///
    /// `Variable`s of this set that are missing from `assignment` are taken to be in state 0.
    ///
    /// # Errors
    /// * `JointlyError::IndexOutOfRange` if `assignment` refers to a `Variable` outside this set,
    ///   or assigns a state beyond a `Variable`'s cardinality
    pub fn encode(&self, assignment: &Assignment) -> Result<usize> {
        if let Some((var, _)) = assignment.iter().find(|&(v, _)| ! self.contains(v)) {
            return Err(JointlyError::IndexOutOfRange(
                format!("{} is not a member of {}", var, self)
            ));
        }

        let mut stride = 1;
        let mut index = 0;
        for var in self.vars.iter() {
            if let Some(&state) = assignment.get(var) {
                if state >= var.cardinality() {
                    return Err(JointlyError::IndexOutOfRange(
                        format!("state {} of {} exceeds its {} states", state, var, var.cardinality())
                    ));
                }
                index += stride * state;
            }
            stride *= var.cardinality();
        }

        Ok(index)
    }

    /// Compute the joint state that corresponds to a linear index. Every `Variable` in the set
    /// receives a state.
    ///
    /// # Errors
    /// * `JointlyError::IndexOutOfRange` if `index >= self.nr_states()`
    pub fn decode(&self, index: usize) -> Result<Assignment> {
        let (assignment, rest) = self.split(index);
        if rest != 0 {
            return Err(JointlyError::IndexOutOfRange(
                format!("linear state {} of {} with {} states", index, self, self.nr_states())
            ));
        }

        Ok(assignment)
    }

    /// Peel the per-variable states off `index`, returning them together with whatever is left
    /// over after the last `Variable`. The remainder is 0 exactly when `index` is in range.
    pub(crate) fn split(&self, mut index: usize) -> (Assignment, usize) {
        let mut assignment = Assignment::new();
        for var in self.vars.iter() {
            assignment.set(var, index % var.cardinality());
            index /= var.cardinality();
        }
        (assignment, index)
    }
}

impl FromIterator<Variable> for VarSet {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let vars = iter.into_iter().sorted().dedup().collect();
        VarSet { vars }
    }
}

impl From<Variable> for VarSet {
    fn from(var: Variable) -> Self {
        VarSet { vars: vec![var] }
    }
}

impl<'a> IntoIterator for &'a VarSet {
    type Item = &'a Variable;
    type IntoIter = slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

impl fmt::Display for VarSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.vars.iter().join(","))
    }
}
