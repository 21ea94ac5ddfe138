//! Defines a `FactorGraph`: a collection of `Variable`s and the `Factor`s over them, representing
//! the factorization of an (unnormalized) probability distribution.

use crate::factor::Factor;
use crate::init::Initialization;
use crate::util::{JointlyError, Result};
use crate::variable::{Assignment, Variable};
use crate::varset::VarSet;

use bidir_map::BidirMap;
use indexmap::IndexSet;

/// Represents a factor graph.
///
/// # Representation
/// The graph structure is not held explicitly. A `Variable` is adjacent to a `Factor` iff it is
/// in the `Factor`'s scope. `Variable`s are kept in ascending label order; `Factor`s are kept in
/// the order they were added. Neither changes once the `FactorGraph` is built.
pub struct FactorGraph {

    /// The `Factor`s that comprise the `FactorGraph`
    factors: Vec<Factor>,

    /// Every `Variable` in the scope of some `Factor`, in ascending label order
    variables: IndexSet<Variable>,

    /// The names of the `Variable`s
    names: BidirMap<Variable, String>

}


impl FactorGraph {

    /// Build a `FactorGraph` from its `Factor`s. `Variable`s are named after their labels.
    ///
    /// # Errors
    /// * `JointlyError::DuplicateVariable` if a label appears with two different cardinalities
    pub fn new(factors: Vec<Factor>) -> Result<Self> {
        FactorGraph::with_names(factors, BidirMap::new())
    }

    fn with_names(factors: Vec<Factor>, mut names: BidirMap<Variable, String>) -> Result<Self> {
        let mut all: Vec<Variable> = factors.iter()
                                            .flat_map(|f| f.scope().iter().cloned())
                                            .collect();
        all.sort();

        for pair in all.windows(2) {
            if pair[0] == pair[1] && pair[0].cardinality() != pair[1].cardinality() {
                return Err(JointlyError::DuplicateVariable(pair[0].label()));
            }
        }

        let variables: IndexSet<Variable> = all.into_iter().collect();

        // for any unnamed variable in a factor, give it a name
        for v in variables.iter() {
            let name = v.to_string();
            if ! names.contains_first_key(v) && ! names.contains_second_key(&name) {
                names.insert(*v, name);
            }
        }

        Ok(FactorGraph { factors, variables, names })
    }


    /// Get the number of `Variable`s in the `FactorGraph`
    pub fn nr_vars(&self) -> usize {
        self.variables.len()
    }


    /// Get the number of `Factor`s in the `FactorGraph`
    pub fn nr_factors(&self) -> usize {
        self.factors.len()
    }


    /// The `Variable` at position `i`
    pub fn var(&self, i: usize) -> Option<&Variable> {
        self.variables.get_index(i)
    }


    /// The position of `var`, if it is part of this `FactorGraph`
    pub fn find_var(&self, var: &Variable) -> Option<usize> {
        self.variables.get_index_of(var)
    }


    /// Iterate over the `Variable`s in order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }


    /// All `Variable`s of the `FactorGraph` as a `VarSet`
    pub fn vars(&self) -> VarSet {
        self.variables.iter().cloned().collect()
    }


    /// The `Factor` at position `i`
    pub fn factor(&self, i: usize) -> Option<&Factor> {
        self.factors.get(i)
    }


    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }


    /// Lookup a `Variable` in the `FactorGraph` based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }


    /// Lookup a `Variable`'s name in the `FactorGraph`.
    pub fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.get_by_first(var)
    }


    /// The product of every `Factor`'s value at a complete assignment.
    ///
    /// # Errors
    /// * `JointlyError::IncompleteAssignment` if a `Variable` is missing from `assignment`
    pub fn unnormalized(&self, assignment: &Assignment) -> Result<f64> {
        // for every factor in the graph
        self.factors.iter()
                    // get the value of the assignment
                    .map(|f| f.value(assignment))
                    // and multiply those values together, bailing on the first error
                    .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }

}


/// An implementation of the [builder pattern] for creating a `FactorGraph`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct FactorGraphBuilder {

    /// The `Factor`s added to the `FactorGraph`
    factors: Vec<Factor>,

    /// The name <-> variable mapping
    names: BidirMap<Variable, String>,

    /// The error state of the builder, if any
    err: Option<JointlyError>

}

impl FactorGraphBuilder {

    /// Construct a new `FactorGraphBuilder`
    pub fn new() -> FactorGraphBuilder {
        FactorGraphBuilder {
            factors: Vec::new(),
            names: BidirMap::new(),
            err: None
        }
    }


    /// Declare the name for a `Variable` in this `FactorGraph`.
    ///
    /// This is optional; `Variable`s added via `with_factor` that do not have a corresponding
    /// name will be named after their label.
    pub fn with_named_variable(mut self, var: &Variable, name: &str) -> Self {
        self.names.insert(*var, String::from(name));
        self
    }


    /// Add a `Factor` to the `FactorGraph`.
    ///
    /// # Arguments
    /// * `scope`: the `Variable`s in the scope of the `Factor`
    /// * `init`: the desired method of initializing the `Factor`
    pub fn with_factor(mut self, scope: VarSet, init: Initialization) -> Self {
        if self.err.is_some() {
            return self;
        }

        match init.build_factor(scope) {
            Ok(f) => {
                self.factors.push(f)
            },
            Err(e) => {
                self.err = Some(e);
            }
        };

        self
    }


    /// Build the `FactorGraph`, ensuring consistency of the `Factor`s and `Variable`s
    ///
    /// # Errors
    /// * the first error raised while adding a `Factor`
    /// * `JointlyError::InvalidScope` if a named `Variable` is not in the scope of any `Factor`
    /// * `JointlyError::DuplicateVariable` if a label is used with different cardinalities
    pub fn build(self) -> Result<FactorGraph> {
        if let Some(e) = self.err {
            return Err(e);
        }

        // make sure there are no variables named but not used in a factor
        for &v in self.names.first_col() {
            let used = self.factors.iter().find_map(|f| {
                let scope = f.scope();
                scope.position(&v).map(|i| scope.as_slice()[i])
            });

            match used {
                None => {
                    return Err(JointlyError::InvalidScope(
                        format!("{} is named but not in the scope of any factor", v)
                    ));
                },
                Some(u) if u.cardinality() != v.cardinality() => {
                    return Err(JointlyError::DuplicateVariable(v.label()));
                },
                _ => ()
            }
        }

        FactorGraph::with_names(self.factors, self.names)
    }

}

impl Default for FactorGraphBuilder {
    fn default() -> Self {
        FactorGraphBuilder::new()
    }
}
