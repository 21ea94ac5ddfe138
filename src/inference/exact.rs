//! Defines `ExactInf`, an `InferenceAlgorithm` that computes beliefs and the log partition function
//! exactly, by building the joint distribution over every `Variable` of a `FactorGraph`.
//!
//! The cost is the product of all cardinalities, so this is only usable on small graphs. It is
//! the reference against which approximate algorithms are checked.

use crate::factor::Factor;
use crate::model::FactorGraph;
use crate::properties::{Properties, PropertySet};
use crate::util::{JointlyError, Result};
use crate::variable::Variable;
use crate::varset::VarSet;
use super::InferenceAlgorithm;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use std::time::Instant;

/// Where an `ExactInf` is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Beliefs hold the neutral table
    Initialized,

    /// Beliefs and log partition function hold the results of the last `run`
    Computed
}

pub struct ExactInf<'a> {

    /// The `FactorGraph` to run inference on
    fg: &'a FactorGraph,

    props: Properties,

    /// One belief per `Variable`, in the order of the `FactorGraph`
    beliefs_v: Vec<Factor>,

    /// One belief per `Factor`, in the order of the `FactorGraph`
    beliefs_f: Vec<Factor>,

    /// Natural log of the total unnormalized mass
    log_z: f64,

    state: EngineState

}


/// The unnormalized uniform table every belief holds before `run`
fn neutral(scope: VarSet) -> Factor {
    let mut f = Factor::uniform(scope);
    f.fill(1.);
    f
}


impl<'a> ExactInf<'a> {

    pub const NAME: &'static str = "EXACT";

    /// Construct an `ExactInf` over `fg` from an option set
    ///
    /// # Errors
    /// * `JointlyError::MalformedConfig` if `opts` does not validate
    pub fn new(fg: &'a FactorGraph, opts: &PropertySet) -> Result<Self> {
        let props = Properties::from_options(opts)?;
        Ok(ExactInf::with_properties(fg, props))
    }

    /// Construct an `ExactInf` over `fg` with already validated settings
    pub fn with_properties(fg: &'a FactorGraph, props: Properties) -> Self {
        let beliefs_v = fg.variables().map(|v| neutral(VarSet::from(*v))).collect();
        let beliefs_f = fg.factors().iter().map(|f| neutral(f.scope().clone())).collect();

        ExactInf {
            fg,
            props,
            beliefs_v,
            beliefs_f,
            log_z: 0.,
            state: EngineState::Initialized
        }
    }

    pub fn properties(&self) -> Properties {
        self.props
    }

    /// The settings as an option set
    pub fn get_properties(&self) -> PropertySet {
        self.props.to_options()
    }

    /// Replace the settings. On error the current settings are kept.
    pub fn set_properties(&mut self, opts: &PropertySet) -> Result<()> {
        self.props = Properties::from_options(opts)?;
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// `true` if the last `run` found a total mass that is zero or not finite, in which case the
    /// beliefs hold NaN values
    pub fn is_degenerate(&self) -> bool {
        self.state == EngineState::Computed && ! self.log_z.is_finite()
    }

    /// Belief of the `Variable` at position `i`
    pub fn belief_v(&self, i: usize) -> Result<Factor> {
        self.beliefs_v.get(i).cloned().ok_or_else(|| {
            JointlyError::IndexOutOfRange(format!("variable {} of {}", i, self.beliefs_v.len()))
        })
    }

    /// Belief of the `Factor` at position `i`
    pub fn belief_f(&self, i: usize) -> Result<Factor> {
        self.beliefs_f.get(i).cloned().ok_or_else(|| {
            JointlyError::IndexOutOfRange(format!("factor {} of {}", i, self.beliefs_f.len()))
        })
    }

}


impl<'a> InferenceAlgorithm for ExactInf<'a> {

    fn name(&self) -> &'static str {
        ExactInf::NAME
    }

    fn identify(&self) -> String {
        format!("{}[verbose={}]", ExactInf::NAME, self.props.verbose)
    }

    fn factor_graph(&self) -> &FactorGraph {
        self.fg
    }

    fn init(&mut self) {
        for b in self.beliefs_v.iter_mut().chain(self.beliefs_f.iter_mut()) {
            b.fill(1.);
        }
        self.log_z = 0.;
        self.state = EngineState::Initialized;
    }

    fn init_vars(&mut self, _vars: &VarSet) -> Result<()> {
        Err(JointlyError::NotImplemented("partial initialization of exact inference"))
    }

    fn run(&mut self) -> Result<f64> {
        let start = Instant::now();
        let verbose = self.props.verbose;

        let all = self.fg.vars();
        let nr_states = all.checked_nr_states()
                           .ok_or(JointlyError::StateSpaceOverflow(all.len()))?;
        if verbose >= 1 {
            info!(
                vars = all.len(),
                factors = self.fg.nr_factors(),
                states = nr_states,
                "{}: enumerating joint state space", ExactInf::NAME
            );
        }

        // the joint is complete and immutable before any marginal is taken from it
        let joint = self.fg.factors()
                           .iter()
                           .try_fold(Factor::identity(), |acc, f| acc.product(f))?;

        let z = joint.sum();
        let log_z = z.ln();
        if ! log_z.is_finite() {
            warn!(z, "{}: total mass is zero or not finite, beliefs are undefined", ExactInf::NAME);
        }

        let vars: Vec<Variable> = self.fg.variables().cloned().collect();
        let beliefs_v = vars.par_iter()
            .map(|v| -> Result<Factor> {
                let b = joint.marginal(&VarSet::from(*v))?.normalized();
                if verbose >= 2 {
                    debug!(var = %v, belief = ?b.values().as_slice(), "variable belief");
                }
                Ok(b)
            })
            .collect::<Result<Vec<Factor>>>()?;

        let beliefs_f = self.fg.factors()
            .par_iter()
            .map(|f| -> Result<Factor> {
                let b = joint.marginal(f.scope())?.normalized();
                if verbose >= 2 {
                    debug!(scope = %f.scope(), "factor belief");
                }
                Ok(b)
            })
            .collect::<Result<Vec<Factor>>>()?;

        self.beliefs_v = beliefs_v;
        self.beliefs_f = beliefs_f;
        self.log_z = log_z;
        self.state = EngineState::Computed;

        let elapsed = start.elapsed().as_secs_f64();
        if verbose >= 1 {
            info!(log_z, elapsed, "{}: finished", ExactInf::NAME);
        }

        Ok(elapsed)
    }

    fn belief(&self, var: &Variable) -> Result<Factor> {
        self.fg.find_var(var)
               .and_then(|i| self.beliefs_v.get(i))
               .cloned()
               .ok_or_else(|| JointlyError::IndexOutOfRange(format!("{} is not in the factor graph", var)))
    }

    fn belief_scope(&self, vars: &VarSet) -> Result<Factor> {
        if vars.len() == 1 {
            return self.belief(&vars.as_slice()[0]);
        }

        match self.fg.factors().iter().position(|f| f.scope() == vars) {
            Some(i) => self.belief_f(i),
            None => Err(JointlyError::NotImplemented("belief of a scope other than a variable or a factor"))
        }
    }

    fn beliefs(&self) -> Vec<Factor> {
        self.beliefs_v.iter().chain(self.beliefs_f.iter()).cloned().collect()
    }

    fn log_z(&self) -> f64 {
        self.log_z
    }

    fn max_diff(&self) -> Result<f64> {
        Err(JointlyError::NotImplemented("exact inference does not iterate"))
    }

    fn iterations(&self) -> Result<usize> {
        Err(JointlyError::NotImplemented("exact inference does not iterate"))
    }

}
