//! Defines the interface to inference engines

use crate::util::Result;
use crate::variable::Variable;

use indexmap::IndexMap;

use std::fmt;

mod variable_elimination;

pub use self::variable_elimination::{
    eliminate, eliminate_variable, EliminationOrder, VariableEliminationEngine
};


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the form:
///     ```P(Y | E = e)```
///
/// `ConditionalInferenceEngine`s are stateful and must take the evidence `e` as an argument to whatever
/// construction mechanism they employ.
pub trait ConditionalInferenceEngine {

    /// Infer the distribution ```P(query | evidence)```
    fn infer(&self, query: Variable) -> Result<Posterior>;

}


/// The posterior distribution of a single boolean query variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Posterior {

    /// The query variable
    variable: Variable,

    /// The probability of each value, in domain order
    probabilities: IndexMap<bool, f64>,

    /// The sum of the unnormalized product, i.e. the probability of the evidence
    normalizer: f64

}

impl Posterior {

    pub(crate) fn new(variable: Variable, probabilities: IndexMap<bool, f64>, normalizer: f64) -> Self {
        Posterior { variable, probabilities, normalizer }
    }

    /// The query variable
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// ```P(query = value | evidence)```
    pub fn probability(&self, value: bool) -> f64 {
        self.probabilities.get(&value).cloned().unwrap_or(0.0)
    }

    /// The probabilities in domain order
    pub fn iter(&self) -> impl Iterator<Item = (&bool, &f64)> {
        self.probabilities.iter()
    }

    /// The normalization constant that was divided out of the unnormalized product. When the
    /// factors are CPDs this is the probability of the evidence.
    pub fn normalizer(&self) -> f64 {
        self.normalizer
    }

    pub fn to_map(&self) -> IndexMap<bool, f64> {
        self.probabilities.clone()
    }
}

impl fmt::Display for Posterior {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (value, p) in self.probabilities.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "P({} = {}) = {:.4}", self.variable, value, p)?;
            first = false;
        }
        Ok(())
    }
}
