//! Definition of the variable module
//!
//! A `Variable` represents a boolean random variable in a Bayesian network. Variables carry no
//! data of their own; they are opaque labels that factors, models and assignments refer to.

use crate::factor::layout;

use indexmap::IndexMap;

use std::fmt;
use std::iter::FromIterator;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The domain shared by every `Variable`. The position of a value in this array is its bit in a
/// factor's row index.
pub const DOMAIN: [bool; 2] = [true, false];

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// An opaque, copyable identifier for a boolean random variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    id: usize
}

impl Variable {

    /// Construct a new, unique binary `Variable`
    pub fn binary() -> Self {
        Variable { id: NEXT_ID.fetch_add(1, Ordering::Relaxed) }
    }

    /// The number of values this `Variable` can take
    pub fn cardinality(&self) -> usize {
        DOMAIN.len()
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X{}", self.id)
    }
}


/// A (possibly partial) assignment of values to `Variable`s. Insertion order is preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: IndexMap<Variable, bool>
}

impl Assignment {

    /// Construct an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign `value` to `var`, replacing any previous value
    pub fn set(&mut self, var: &Variable, value: bool) {
        self.values.insert(*var, value);
    }

    /// Get the value assigned to `var`, if any
    pub fn get(&self, var: &Variable) -> Option<&bool> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The assigned `Variable`s, in insertion order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &bool)> {
        self.values.iter()
    }

    /// The part of this `Assignment` that concerns the given scope
    pub fn restricted_to(&self, scope: &[Variable]) -> Assignment {
        self.values
            .iter()
            .filter(|(v, _)| scope.contains(*v))
            .map(|(&v, &b)| (v, b))
            .collect()
    }
}

impl FromIterator<(Variable, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, bool)>>(iter: I) -> Self {
        Assignment { values: iter.into_iter().collect() }
    }
}


/// Enumerate every full assignment to `scope`, in the row order of a factor over that scope.
pub fn all_assignments(scope: &[Variable]) -> impl Iterator<Item = Assignment> + '_ {
    let width = scope.len();
    (0..layout::row_count(width).unwrap_or(0)).map(move |row| {
        scope.iter()
             .enumerate()
             .map(|(pos, &v)| (v, layout::decode(layout::bit_at(row, pos, width))))
             .collect()
    })
}


// Unit Tests for the Variable struct.
#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn binary() {
        let a = Variable::binary();
        let b = Variable::binary();

        assert_ne!(a, b);
        assert_eq!(a.cardinality(), 2);
        assert_eq!(format!("{}", a), format!("X{}", a.id()));
    }

    #[test]
    fn assignment() {
        let a = Variable::binary();
        let b = Variable::binary();

        let mut assn = Assignment::new();
        assert!(assn.is_empty());
        assn.set(&a, true);
        assn.set(&b, false);
        assn.set(&a, false);

        assert_eq!(assn.len(), 2);
        assert_eq!(assn.get(&a), Some(&false));
        assert_eq!(assn.get(&b), Some(&false));
        assert_eq!(assn.variables().cloned().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn restricted_to() {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let assn: Assignment = vec![(a, true), (c, false)].into_iter().collect();

        let r = assn.restricted_to(&[b, c]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.get(&c), Some(&false));
        assert!(assn.restricted_to(&[b]).is_empty());
    }

    #[test]
    fn enumerate_assignments() {
        let a = Variable::binary();
        let b = Variable::binary();

        let all: Vec<Assignment> = all_assignments(&[a, b]).collect();
        assert_eq!(all.len(), 4);

        // row 0 is the all-true assignment, the last variable varies fastest
        let expected = [(true, true), (true, false), (false, true), (false, false)];
        for (assn, &(x, y)) in all.iter().zip(expected.iter()) {
            assert_eq!(assn.get(&a), Some(&x));
            assert_eq!(assn.get(&b), Some(&y));
        }

        let empty: Vec<Assignment> = all_assignments(&[]).collect();
        assert_eq!(empty, vec![Assignment::new()]);
    }
}
