//! Module containing initialization routines for the factors of a `FactorGraph`.

use crate::factor::{Factor, Values};
use crate::util::{JointlyError, Result};
use crate::varset::VarSet;

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Defines possible ways to initialize a `Factor`.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// A uniform distribution over all joint states
    Uniform,

    /// Randomly initialize the values, then normalize
    Random,

    /// User defined factor
    Table(Factor)
}


impl Initialization {

    /// Construct a factor, initialized based on ```self```
    ///
    /// # Args
    /// * `scope`: the `Variable`s over which to build the `Factor`
    ///
    /// # Errors
    /// * `JointlyError::InvalidScope` if `scope` is empty, or a user defined `Factor` is over a
    ///   different scope
    pub fn build_factor(self, scope: VarSet) -> Result<Factor> {
        if scope.is_empty() {
            return Err(JointlyError::InvalidScope(String::from("Scope may not be empty")));
        }

        match self {
            Initialization::Uniform => {
                Ok(Factor::uniform(scope))
            },
            Initialization::Random => {
                let n = scope.nr_states();
                let mut tbl: Values = nd::Array::random(n, Uniform::new(1.0, 100.0));
                let z = tbl.sum();
                tbl.mapv_inplace(|e| e / z);
                Factor::new(scope, tbl)
            },
            Initialization::Table(f) => {
                // if this is a user defined factor, it just needs to be verified and returned
                if *f.scope() == scope {
                    Ok(f)
                } else {
                    Err(JointlyError::InvalidScope(
                        format!("factor over {} supplied for {}", f.scope(), scope)
                    ))
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::variable::Variable;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform() {
        let scope = VarSet::from_vars(&[Variable::binary(0), Variable::new(1, 3).unwrap()]);
        let f = Initialization::Uniform.build_factor(scope.clone()).unwrap();

        assert_eq!(f.scope(), &scope);
        assert!(f.values().iter().all(|&v| (v - 1. / 6.).abs() < 1e-12));
    }

    #[test]
    fn random() {
        let scope = VarSet::from_vars(&[Variable::binary(0), Variable::new(1, 3).unwrap()]);
        let f = Initialization::Random.build_factor(scope.clone()).unwrap();

        assert_eq!(f.nr_states(), 6);
        assert!(f.values().iter().all(|&v| v > 0.));
        assert_abs_diff_eq!(f.sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn table() {
        let a = Variable::binary(0);
        let b = Variable::binary(1);
        let f = Factor::new(VarSet::from(a), array![1., 3.]).unwrap();

        let built = Initialization::Table(f.clone()).build_factor(VarSet::from(a)).unwrap();
        assert_eq!(built, f);

        match Initialization::Table(f).build_factor(VarSet::from(b)) {
            Err(JointlyError::InvalidScope(_)) => (),
            other => panic!("unexpected result {:?}", other)
        };
    }

    #[test]
    fn empty_scope() {
        match Initialization::Uniform.build_factor(VarSet::new()) {
            Err(JointlyError::InvalidScope(_)) => (),
            other => panic!("unexpected result {:?}", other)
        };
    }
}
