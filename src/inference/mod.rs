//! Defines the interface to inference algorithms

use crate::factor::Factor;
use crate::model::FactorGraph;
use crate::util::Result;
use crate::variable::Variable;
use crate::varset::VarSet;

mod exact;

pub use self::exact::{EngineState, ExactInf};


/// An `InferenceAlgorithm` computes beliefs (normalized marginals) and the log partition function
/// of a `FactorGraph`.
///
/// Every algorithm exposes the same operations, so callers can swap an exact algorithm for an
/// approximate one through `Box<dyn InferenceAlgorithm>`. Operations that only make sense for
/// some algorithms fail with `JointlyError::NotImplemented` elsewhere.
pub trait InferenceAlgorithm {

    /// Name of the algorithm
    fn name(&self) -> &'static str;

    /// Name of the algorithm together with its settings, for logging
    fn identify(&self) -> String;

    /// The `FactorGraph` this algorithm works on
    fn factor_graph(&self) -> &FactorGraph;

    /// Reset all beliefs and the log partition function
    fn init(&mut self);

    /// Reset the state associated with `vars` only
    fn init_vars(&mut self, vars: &VarSet) -> Result<()>;

    /// Run the algorithm. Returns an algorithm specific cost measure.
    fn run(&mut self) -> Result<f64>;

    /// The belief of a single `Variable`
    fn belief(&self, var: &Variable) -> Result<Factor>;

    /// The belief of a set of `Variable`s
    fn belief_scope(&self, vars: &VarSet) -> Result<Factor>;

    /// All `Variable` beliefs, followed by all `Factor` beliefs
    fn beliefs(&self) -> Vec<Factor>;

    /// The log partition function
    fn log_z(&self) -> f64;

    /// Largest change of a belief in the last iteration
    fn max_diff(&self) -> Result<f64>;

    /// Number of iterations performed by the last `run`
    fn iterations(&self) -> Result<usize>;

}


#[cfg(test)]
/// Tests for the inference algorithms in this module, hoisted here so that they can be shared by
/// future algorithms. Tests specific to an algorithm are held within that submodule's tests module.
mod tests {
    use super::*;
    use crate::index::all_assignments;
    use crate::init::Initialization;
    use crate::model::FactorGraphBuilder;
    use crate::properties::{Properties, PropertySet};
    use crate::util::JointlyError;
    use crate::variable::Assignment;
    use approx::assert_abs_diff_eq;

    fn exact(model: &FactorGraph) -> Box<dyn InferenceAlgorithm + '_> {
        Box::new(ExactInf::with_properties(model, Properties { verbose: 2 }))
    }

    /// Every belief of `engine` must sum to one
    fn assert_normalized(engine: &dyn InferenceAlgorithm) {
        for b in engine.beliefs() {
            assert_abs_diff_eq!(b.sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    /// Two binary variables joined by a constant factor
    fn uniform_pair() {
        let a = Variable::binary(0);
        let b = Variable::binary(1);
        let f = Factor::filled(VarSet::from_vars(&[a, b]), 1.).unwrap();
        let model = FactorGraph::new(vec![f]).unwrap();

        let mut engine = exact(&model);
        engine.init();
        engine.run().unwrap();

        assert_abs_diff_eq!(engine.log_z(), 4f64.ln(), epsilon = 1e-12);
        for v in &[a, b] {
            assert_eq!(engine.belief(v).unwrap().values().to_vec(), vec![0.5, 0.5]);
        }
        assert_eq!(engine.belief_scope(&VarSet::from_vars(&[a, b])).unwrap().values().to_vec(), vec![0.25; 4]);
        assert_normalized(&*engine);
    }

    #[test]
    fn single_variable() {
        let x = Variable::new(0, 3).unwrap();
        let f = Factor::new(VarSet::from(x), array![2., 1., 3.]).unwrap();
        let model = FactorGraph::new(vec![f]).unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();

        let b = engine.belief(&x).unwrap();
        let expected = [2. / 6., 1. / 6., 3. / 6.];
        for (got, want) in b.values().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(engine.log_z(), 6f64.ln(), epsilon = 1e-12);
        assert_eq!(engine.belief_scope(&VarSet::from(x)).unwrap(), b);
    }

    #[test]
    /// The Misconception example from Koller & Friedman Section 4.1
    fn misconception() {
        let a = Variable::binary(0);
        let b = Variable::binary(1);
        let c = Variable::binary(2);
        let d = Variable::binary(3);

        let ab = Factor::from_table(vec![a, b], array![[30.0, 5.0], [1.0, 10.0]].into_dyn()).unwrap();
        let bc = Factor::from_table(vec![b, c], array![[100.0, 1.0], [1.0, 100.0]].into_dyn()).unwrap();
        let cd = Factor::from_table(vec![c, d], array![[1.0, 100.0], [100.0, 1.0]].into_dyn()).unwrap();
        let da = Factor::from_table(vec![d, a], array![[100.0, 1.0], [1.0, 100.0]].into_dyn()).unwrap();
        let model = FactorGraph::new(vec![ab, bc, cd, da]).unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();

        assert_abs_diff_eq!(engine.log_z(), 7_201_840f64.ln(), epsilon = 1e-9);
        assert_normalized(&*engine);

        // P(a0, b0) from K&F Figure 4.2: 0.04 + 0.04 + 0.04 + 0.0 (rounded)
        let pab = engine.belief_scope(&VarSet::from_vars(&[a, b])).unwrap();
        let p00 = pab.value(&Assignment::new().with(&a, 0).with(&b, 0)).unwrap();
        assert_abs_diff_eq!(p00, 0.125, epsilon = 0.01);
    }

    #[test]
    /// Beliefs agree with sums of the unnormalized distribution over every complete assignment
    fn brute_force_agreement() {
        let a = Variable::binary(0);
        let b = Variable::new(1, 3).unwrap();
        let c = Variable::new(2, 4).unwrap();
        let d = Variable::binary(3);

        let model = FactorGraphBuilder::new()
            .with_factor(VarSet::from_vars(&[a, b]), Initialization::Random)
            .with_factor(VarSet::from_vars(&[b, c, d]), Initialization::Random)
            .with_factor(VarSet::from_vars(&[d, a]), Initialization::Random)
            .with_factor(VarSet::from(c), Initialization::Random)
            .build()
            .unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();

        let all = model.vars();
        let z: f64 = all_assignments(&all).map(|x| model.unnormalized(&x).unwrap()).sum();
        assert_abs_diff_eq!(engine.log_z().exp(), z, epsilon = 1e-9 * z);

        for v in model.variables() {
            let belief = engine.belief(v).unwrap();
            for state in 0..v.cardinality() {
                let mass: f64 = all_assignments(&all)
                    .filter(|x| x.get(v) == Some(&state))
                    .map(|x| model.unnormalized(&x).unwrap())
                    .sum();
                let got = belief.value(&Assignment::new().with(v, state)).unwrap();
                assert_abs_diff_eq!(got, mass / z, epsilon = 1e-9);
            }
        }

        for (i, f) in model.factors().iter().enumerate() {
            let belief = engine.belief_scope(f.scope()).unwrap();
            assert_eq!(belief, engine.beliefs()[model.nr_vars() + i]);
            for (idx, sub) in all_assignments(f.scope()).enumerate() {
                let mass: f64 = all_assignments(&all)
                    .filter(|x| f.scope().iter().all(|v| x.get(v) == sub.get(v)))
                    .map(|x| model.unnormalized(&x).unwrap())
                    .sum();
                assert_abs_diff_eq!(belief.get(idx).unwrap(), mass / z, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn run_is_idempotent() {
        let a = Variable::binary(0);
        let b = Variable::new(1, 3).unwrap();
        let model = FactorGraphBuilder::new()
            .with_factor(VarSet::from_vars(&[a, b]), Initialization::Random)
            .with_factor(VarSet::from(a), Initialization::Random)
            .build()
            .unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();
        let first = (engine.beliefs(), engine.log_z());
        engine.run().unwrap();
        let second = (engine.beliefs(), engine.log_z());

        assert_eq!(first, second);
    }

    #[test]
    fn init_clears_beliefs() {
        let x = Variable::new(0, 3).unwrap();
        let f = Factor::new(VarSet::from(x), array![2., 1., 3.]).unwrap();
        let model = FactorGraph::new(vec![f]).unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();
        engine.init();

        assert_eq!(engine.log_z(), 0.);
        assert_eq!(engine.belief(&x).unwrap().values().to_vec(), vec![1., 1., 1.]);
        for b in engine.beliefs() {
            assert!(b.values().iter().all(|&v| v == 1.));
        }
    }

    #[test]
    /// Contradictory factors leave no mass; the result is reported as-is
    fn zero_mass() {
        let a = Variable::binary(0);
        let f1 = Factor::new(VarSet::from(a), array![1., 0.]).unwrap();
        let f2 = Factor::new(VarSet::from(a), array![0., 1.]).unwrap();
        let model = FactorGraph::new(vec![f1, f2]).unwrap();

        let mut engine = ExactInf::with_properties(&model, Properties::default());
        engine.run().unwrap();

        assert!(engine.is_degenerate());
        assert_eq!(engine.log_z(), std::f64::NEG_INFINITY);
        assert!(engine.belief(&a).unwrap().values().iter().all(|v| v.is_nan()));
    }

    #[test]
    /// Each entry is finite but their product overflows to +inf
    fn infinite_mass() {
        let a = Variable::binary(0);
        let b = Variable::binary(1);
        let f1 = Factor::new(VarSet::from(a), array![1e200, 1e200]).unwrap();
        let f2 = Factor::new(VarSet::from_vars(&[a, b]), array![1e200, 1e200, 1e200, 1e200]).unwrap();
        let model = FactorGraph::new(vec![f1, f2]).unwrap();

        let mut engine = ExactInf::with_properties(&model, Properties::default());
        engine.run().unwrap();

        assert!(engine.is_degenerate());
        assert_eq!(engine.log_z(), std::f64::INFINITY);
        for b in engine.beliefs() {
            assert!(b.values().iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn unsupported_operations() {
        let a = Variable::binary(0);
        let b = Variable::binary(1);
        let c = Variable::binary(2);
        let model = FactorGraph::new(vec![
            Factor::uniform(VarSet::from_vars(&[a, b])),
            Factor::uniform(VarSet::from_vars(&[b, c]))
        ]).unwrap();

        let mut engine = exact(&model);
        engine.run().unwrap();

        let not_implemented = |r: Result<()>| match r {
            Err(JointlyError::NotImplemented(_)) => (),
            other => panic!("unexpected result {:?}", other)
        };

        not_implemented(engine.max_diff().map(|_| ()));
        not_implemented(engine.iterations().map(|_| ()));
        not_implemented(engine.init_vars(&VarSet::from(a)));
        not_implemented(engine.belief_scope(&VarSet::from_vars(&[a, c])).map(|_| ()));
        not_implemented(engine.belief_scope(&VarSet::from_vars(&[a, b, c])).map(|_| ()));
        not_implemented(engine.belief_scope(&VarSet::new()).map(|_| ()));
    }

    #[test]
    fn construction_rejects_unknown_options() {
        let a = Variable::binary(0);
        let model = FactorGraph::new(vec![Factor::uniform(VarSet::from(a))]).unwrap();

        let mut opts = PropertySet::new();
        opts.insert(String::from("verbose"), String::from("1"));
        opts.insert(String::from("tol"), String::from("1e-9"));

        match ExactInf::new(&model, &opts) {
            Err(JointlyError::MalformedConfig(_)) => (),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("accepted an unknown option")
        };
    }

    #[test]
    fn verbosity_does_not_change_results() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let a = Variable::binary(0);
        let b = Variable::new(1, 3).unwrap();
        let model = FactorGraphBuilder::new()
            .with_factor(VarSet::from_vars(&[a, b]), Initialization::Random)
            .build()
            .unwrap();

        let mut quiet = ExactInf::with_properties(&model, Properties { verbose: 0 });
        let mut loud = ExactInf::with_properties(&model, Properties { verbose: 3 });
        quiet.run().unwrap();
        loud.run().unwrap();

        assert_eq!(quiet.beliefs(), loud.beliefs());
        assert_eq!(quiet.log_z(), loud.log_z());
        assert_eq!(loud.factor_graph().nr_factors(), 1);
        assert_eq!(loud.name(), "EXACT");
    }
}
