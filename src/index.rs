//! Iteration over joint states.
//!
//! `IndexFor` walks the joint states of one `VarSet` in linear order while tracking the linear
//! index of the same joint state restricted to another `VarSet`. It is the workhorse of factor
//! multiplication and marginalization.

use crate::variable::Assignment;
use crate::varset::VarSet;

/// Iterates over the linear states of `sup`, yielding for each one the linear index of the
/// corresponding joint state of `sub`. `Variable`s of `sub` that do not appear in `sup` are held
/// at state 0.
#[derive(Clone, Debug)]
pub struct IndexFor {
    /// Current linear index into `sub`
    index: usize,

    /// For every `Variable` of `sup`, its stride in `sub` (0 if it is not in `sub`)
    strides: Vec<usize>,

    /// Cardinalities of the `Variable`s of `sup`
    states: Vec<usize>,

    /// Current state of every `Variable` of `sup`
    counter: Vec<usize>,

    /// Number of joint states of `sup` not yet visited
    remaining: usize
}

impl IndexFor {

    pub fn new(sub: &VarSet, sup: &VarSet) -> Self {
        let mut strides = Vec::with_capacity(sup.len());
        let mut stride = 1;
        let mut sub_vars = sub.iter().peekable();

        // both sets are sorted, so the strides can be found in one merge pass
        for var in sup.iter() {
            while let Some(&&v) = sub_vars.peek() {
                if v < *var {
                    stride *= v.cardinality();
                    sub_vars.next();
                } else {
                    break;
                }
            }

            match sub_vars.peek() {
                Some(&&v) if v == *var => {
                    strides.push(stride);
                    stride *= v.cardinality();
                    sub_vars.next();
                },
                _ => strides.push(0)
            }
        }

        let states: Vec<usize> = sup.iter().map(|v| v.cardinality()).collect();

        IndexFor {
            index: 0,
            counter: vec![0; states.len()],
            remaining: sup.nr_states(),
            strides,
            states
        }
    }

    fn advance(&mut self) {
        for k in 0..self.counter.len() {
            self.counter[k] += 1;
            self.index += self.strides[k];
            if self.counter[k] < self.states[k] {
                return;
            }
            self.index -= self.strides[k] * self.states[k];
            self.counter[k] = 0;
        }
    }
}

impl Iterator for IndexFor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.index;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexFor {}


/// Iterator over every complete `Assignment` to a `VarSet`, in linear index order.
pub struct Assignments {
    scope: VarSet,
    next: usize,
    end: usize
}

impl Iterator for Assignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.next >= self.end {
            return None;
        }

        let (assignment, _) = self.scope.split(self.next);
        self.next += 1;
        Some(assignment)
    }
}

/// Enumerate all complete `Assignment`s to the `Variable`s of `scope`
pub fn all_assignments(scope: &VarSet) -> Assignments {
    Assignments {
        scope: scope.clone(),
        next: 0,
        end: scope.nr_states()
    }
}
