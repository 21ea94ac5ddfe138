//! Definition of the factor module
//!
//! A `Factor` represents a non-negative function over the joint states of a `VarSet`. Values are
//! stored flat, in the linear index order defined by the `VarSet` (first `Variable` fastest), so
//! product and marginalization reduce to walking indices with `IndexFor`.

use crate::index::{all_assignments, IndexFor};
use crate::util::{JointlyError, Result};
use crate::variable::{Assignment, Variable};
use crate::varset::VarSet;

use ndarray::prelude as nd;

/// A shaped f64 table, one axis per `Variable`, used to build `Factor`s
pub type Table = nd::ArrayD<f64>;

/// Flat factor values, indexed by linear state
pub type Values = nd::Array1<f64>;


#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The scope of the `Factor`
    scope: VarSet,

    /// One value per joint state of `scope`
    values: Values
}


impl Factor {

    /// Create a new `Factor` from values laid out in the linear order of `scope`
    ///
    /// # Errors
    /// * `JointlyError::InvalidScope` if the number of values differs from `scope.nr_states()`
    /// * `JointlyError::NonFiniteValue` if any value is NaN or infinite
    /// * `JointlyError::NegativeValue` if any value is negative
    pub fn new(scope: VarSet, values: Values) -> Result<Self> {
        if values.len() != scope.nr_states() {
            return Err(JointlyError::InvalidScope(
                format!("{} values given for {} with {} states", values.len(), scope, scope.nr_states())
            ));
        }

        if values.iter().any(|v| ! v.is_finite()) {
            return Err(JointlyError::NonFiniteValue);
        } else if values.iter().any(|&v| v < 0.0) {
            return Err(JointlyError::NegativeValue);
        }

        Ok(Factor { scope, values })
    }


    /// Create a new `Factor` from a table whose axes follow the order of `vars`. The order of
    /// `vars` is arbitrary; the table is re-laid out into canonical order.
    ///
    /// # Errors
    /// * `JointlyError::InvalidScope` if `vars` holds a duplicate, or the table shape does not
    ///   match the cardinalities of `vars`
    /// * `JointlyError::NegativeValue` if any value is negative
    pub fn from_table(vars: Vec<Variable>, table: Table) -> Result<Self> {
        let scope = VarSet::from_vars(&vars);
        if scope.len() != vars.len() {
            return Err(JointlyError::InvalidScope(String::from("Duplicate variable in scope")));
        } else if vars.len() != table.ndim() {
            return Err(JointlyError::InvalidScope(
                String::from("Cardinality of scope must match number of table dimensions")
            ));
        }

        for (v, t) in vars.iter().map(|v| v.cardinality()).zip(table.shape().iter()) {
            if v != *t {
                return Err(JointlyError::InvalidScope(String::from("Dimensions do not match")));
            }
        }

        let values = all_assignments(&scope)
            .map(|assn| {
                let idx: Vec<usize> = vars.iter()
                                          .map(|v| assn.get(v).cloned().unwrap_or(0))
                                          .collect();
                table[nd::IxDyn(&idx)]
            })
            .collect();

        Factor::new(scope, values)
    }


    /// A `Factor` with every value equal to `value`
    pub fn filled(scope: VarSet, value: f64) -> Result<Self> {
        let values = Values::from_elem(scope.nr_states(), value);
        Factor::new(scope, values)
    }


    /// The normalized uniform `Factor` over `scope`
    pub fn uniform(scope: VarSet) -> Self {
        let n = scope.nr_states();
        let values = Values::from_elem(n, 1. / (n as f64));
        Factor { scope, values }
    }


    /// The multiplicative identity: the empty scope with the single value 1
    pub fn identity() -> Self {
        Factor { scope: VarSet::new(), values: Values::ones(1) }
    }


    /// Retrieve the scope of the `Factor`.
    pub fn scope(&self) -> &VarSet {
        &self.scope
    }


    /// The values of the `Factor`, in linear state order
    pub fn values(&self) -> &Values {
        &self.values
    }


    pub fn nr_states(&self) -> usize {
        self.values.len()
    }


    /// The value at a linear state, if in range
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).cloned()
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// assignment: a full assignment to the scope of a `Factor`. The assignment's scope may be a
    ///             superset of the `Factor`s scope.
    ///
    /// # Errors
    /// * `JointlyError::IncompleteAssignment`, if a `Variable` of the scope is not assigned
    /// * `JointlyError::IndexOutOfRange`, if a state exceeds its `Variable`'s cardinality
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let mut restricted = Assignment::new();
        for var in self.scope.iter() {
            match assignment.get(var) {
                Some(&state) => restricted.set(var, state),
                None => return Err(JointlyError::IncompleteAssignment)
            }
        }

        let index = self.scope.encode(&restricted)?;
        Ok(self.values[index])
    }


    /// Sum of all values
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }


    /// Set every value to `value`
    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }


    /// `true` if no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }


    /// Largest absolute difference between the values of two `Factor`s over the same scope
    ///
    /// # Errors
    /// * `JointlyError::InvalidScope` if the scopes differ
    pub fn max_abs_diff(&self, other: &Factor) -> Result<f64> {
        if self.scope != other.scope {
            return Err(JointlyError::InvalidScope(
                format!("cannot compare {} with {}", self.scope, other.scope)
            ));
        }

        Ok(self.values.iter()
                      .zip(other.values.iter())
                      .map(|(a, b)| (a - b).abs())
                      .fold(0., f64::max))
    }


    /// Product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// # Returns
    /// A new `Factor` of scope union(self.scope(), other.scope()). Scopes need not intersect; the
    /// values are broadcast over the `Variable`s each side lacks.
    ///
    /// # Errors
    /// * `JointlyError::DuplicateVariable` if a label is shared with a different cardinality
    pub fn product(&self, other: &Self) -> Result<Self> {
        if let Some(v) = self.scope.conflict(&other.scope) {
            return Err(JointlyError::DuplicateVariable(v.label()));
        }

        let scope = self.scope.union(&other.scope);
        let values = IndexFor::new(&self.scope, &scope)
            .zip(IndexFor::new(&other.scope, &scope))
            .map(|(i, j)| self.values[i] * other.values[j])
            .collect();

        Ok(Factor { scope, values })
    }


    /// Sum this `Factor` onto `keep`, eliminating every other `Variable`.
    ///
    /// # Errors
    /// * `JointlyError::InvalidScope` if `keep` is not a subset of the scope
    /// * `JointlyError::DuplicateVariable` if `keep` disagrees with the scope on a cardinality
    pub fn marginal(&self, keep: &VarSet) -> Result<Self> {
        if ! keep.is_subset_of(&self.scope) {
            return Err(JointlyError::InvalidScope(
                format!("{} is not a subset of {}", keep, self.scope)
            ));
        } else if let Some(v) = keep.conflict(&self.scope) {
            return Err(JointlyError::DuplicateVariable(v.label()));
        }

        Ok(self.sum_onto(keep))
    }


    /// Marginalize the `Factor` over the given `Variable`
    ///
    /// Defined in Koller & Friedman 9.3.1
    ///
    /// A `Variable` outside the scope leaves the `Factor` unchanged.
    pub fn marginalize(&self, var: Variable) -> Self {
        self.sum_onto(&self.scope.difference(&VarSet::from(var)))
    }


    /// Divide by the sum of all values. A zero sum produces NaN values.
    pub fn normalized(&self) -> Self {
        let z = self.sum();
        Factor { scope: self.scope.clone(), values: &self.values / z }
    }


    /// In place `normalized`, returning the sum divided by
    pub fn normalize(&mut self) -> f64 {
        let z = self.sum();
        self.values.mapv_inplace(|v| v / z);
        z
    }


    // `keep` must be a subset of the scope
    fn sum_onto(&self, keep: &VarSet) -> Self {
        let mut values = Values::zeros(keep.nr_states());
        for (i, j) in IndexFor::new(keep, &self.scope).enumerate() {
            values[j] += self.values[i];
        }

        Factor { scope: keep.clone(), values }
    }

}
