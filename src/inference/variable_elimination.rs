//! Defines a `ConditionalInferenceEngine` that uses exact inference by variable elimination to
//! answer conditional inference queries over a single query variable.
//!
//! The run has three phases: every factor is restricted by the evidence relevant to it, every
//! unobserved non-query variable is eliminated in the supplied order by multiplying the factors
//! that mention it and summing it out, and the remaining factors are multiplied on the query and
//! normalized.

use crate::factor::ops::{multiply_batch, sum_out};
use crate::factor::{layout, Factor};
use crate::model::Model;
use crate::util::{Result, VelimError};
use crate::variable::{Assignment, Variable, DOMAIN};
use super::{ConditionalInferenceEngine, Posterior};

use indexmap::IndexMap;
use itertools::Itertools;


/// The order in which variables are eliminated
#[derive(Clone, Debug, PartialEq)]
pub enum EliminationOrder {
    /// Eliminate in the order the variables were added to the model
    Model,

    /// Eliminate in the given order. It must list every model variable except the query exactly
    /// once; the query may be listed and is skipped.
    Explicit(Vec<Variable>)
}

impl Default for EliminationOrder {
    fn default() -> Self {
        EliminationOrder::Model
    }
}


pub struct VariableEliminationEngine {

    /// The variables of the model, in model order
    variables: Vec<Variable>,

    /// The factors of the model, unrestricted
    factors: Vec<Factor>,

    /// The evidence every query is conditioned on
    evidence: Assignment,

    /// The elimination order used by every query
    order: EliminationOrder

}


impl VariableEliminationEngine {

    /// Build an engine over `model` that answers queries conditioned on `evidence`.
    ///
    /// # Errors
    /// * `VelimError::UnknownVariable`, if the evidence mentions a variable not in the model
    pub fn new(model: &Model, evidence: &Assignment) -> Result<Self> {
        if let Some(v) = evidence.variables().find(|v| !model.contains(v)) {
            return Err(VelimError::UnknownVariable(*v));
        }

        Ok(VariableEliminationEngine {
            variables: model.variables().to_vec(),
            factors: model.factors().to_vec(),
            evidence: evidence.clone(),
            order: EliminationOrder::Model
        })
    }

    /// Eliminate variables in `order` instead of the model order
    pub fn with_order(mut self, order: Vec<Variable>) -> Self {
        self.order = EliminationOrder::Explicit(order);
        self
    }

    pub fn order(&self) -> &EliminationOrder {
        &self.order
    }
}


impl ConditionalInferenceEngine for VariableEliminationEngine {

    fn infer(&self, query: Variable) -> Result<Posterior> {
        let order = match self.order {
            EliminationOrder::Model => self.variables.clone(),
            EliminationOrder::Explicit(ref order) => {
                check_order(order, &self.variables, query)?;
                order.clone()
            }
        };

        let restricted = restrict(&self.variables, &self.factors, query, &self.evidence)?;
        let remaining = eliminate_all(&order, restricted, query, &self.evidence)?;
        normalize(query, &remaining)
    }
}


/// Compute ```P(query | evidence)``` by variable elimination, eliminating in the order of
/// `variables`.
///
/// # Errors
/// * `VelimError::InconsistentQuery`, if `query` is observed or not in `variables`
/// * `VelimError::UnknownVariable`, if the evidence or a factor mentions a variable not in
///   `variables`
/// * `VelimError::EmptyEliminationSet`, if no factor mentions `query`
/// * `VelimError::ZeroNormalizer`, if the evidence has probability zero
pub fn eliminate(
    variables: &[Variable],
    factors: &[Factor],
    query: Variable,
    evidence: &Assignment,
) -> Result<Posterior> {
    if let Some(v) = evidence.variables().find(|v| !variables.contains(v)) {
        return Err(VelimError::UnknownVariable(*v));
    }

    let restricted = restrict(variables, factors, query, evidence)?;
    let remaining = eliminate_all(variables, restricted, query, evidence)?;
    normalize(query, &remaining)
}


/// Restriction phase: validate the query and restrict every factor by the evidence relevant to
/// it.
fn restrict(
    variables: &[Variable],
    factors: &[Factor],
    query: Variable,
    evidence: &Assignment,
) -> Result<Vec<Factor>> {
    if !variables.contains(&query) {
        return Err(VelimError::InconsistentQuery(query, "the query is not in the model"));
    }
    if evidence.contains(&query) {
        return Err(VelimError::InconsistentQuery(query, "the query is observed"));
    }

    let mut restricted = Vec::with_capacity(factors.len());
    for f in factors.iter() {
        if let Some(v) = f.scope().iter().find(|v| !variables.contains(v)) {
            return Err(VelimError::UnknownVariable(*v));
        }

        let relevant = evidence.restricted_to(f.scope());
        let f = if relevant.is_empty() { f.clone() } else { f.restrict(&relevant) };

        if let Some(v) = f.scope().iter().find(|v| evidence.contains(v)) {
            return Err(VelimError::ResidualObservation(*v));
        }
        restricted.push(f);
    }

    Ok(restricted)
}


/// Elimination phase: eliminate every unobserved variable of `order` except `query`
fn eliminate_all(
    order: &[Variable],
    factors: Vec<Factor>,
    query: Variable,
    evidence: &Assignment,
) -> Result<Vec<Factor>> {
    order.iter()
         .filter(|&&v| v != query && !evidence.contains(&v))
         .try_fold(factors, |factors, v| eliminate_variable(v, factors))
}


/// Eliminate `var` from `factors` by multiplying the factors containing it and summing it out.
///
/// # Returns
/// the factors that do not mention `var`, followed by the new factor. If no factor mentions
/// `var`, `factors` is returned unchanged.
pub fn eliminate_variable(var: &Variable, factors: Vec<Factor>) -> Result<Vec<Factor>> {
    let (containing, mut rest): (Vec<Factor>, Vec<Factor>) = factors
        .into_iter()
        .partition(|f| f.contains(var));

    if containing.is_empty() {
        return Ok(rest);
    }

    let product = multiply_batch(var, &containing)?;
    let tau = sum_out(var, &product)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "eliminated {} from {} factors, new factor over [{}]",
        var,
        containing.len(),
        tau.scope().iter().join(", ")
    );

    rest.push(tau);
    Ok(rest)
}


/// Query phase: multiply the remaining factors on `query` and normalize the product
fn normalize(query: Variable, factors: &[Factor]) -> Result<Posterior> {
    let product = multiply_batch(&query, factors)?;

    if product.scope() != [query] {
        let leftover = product.scope().iter().filter(|&&v| v != query).join(", ");
        return Err(VelimError::InvalidOrder(format!("variables [{}] were never eliminated", leftover)));
    }

    let normalizer = product.table().sum();

    #[cfg(feature = "tracing")]
    tracing::debug!("normalizer for {} is {}", query, normalizer);

    if normalizer <= 0.0 {
        return Err(VelimError::ZeroNormalizer);
    }

    let probabilities: IndexMap<bool, f64> = DOMAIN
        .iter()
        .map(|&value| (value, product.table()[layout::encode(value)] / normalizer))
        .collect();

    Ok(Posterior::new(query, probabilities, normalizer))
}


/// Check that an explicit elimination order lists every variable but the query exactly once
fn check_order(order: &[Variable], variables: &[Variable], query: Variable) -> Result<()> {
    if let Some(v) = order.iter().find(|v| !variables.contains(v)) {
        return Err(VelimError::UnknownVariable(*v));
    }
    if let Some(v) = order.iter().duplicates().next() {
        return Err(VelimError::InvalidOrder(format!("{} is listed twice", v)));
    }

    let missing = variables.iter()
                           .filter(|&&v| v != query && !order.contains(&v))
                           .join(", ");
    if !missing.is_empty() {
        return Err(VelimError::InvalidOrder(format!("[{}] are not listed", missing)));
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Initialization;
    use crate::model::ModelBuilder;

    fn chain() -> (Variable, Variable, Variable, Model) {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let model = ModelBuilder::new()
                        .with_named_variable(&a, "A", &[], Initialization::Table(vec![0.6, 0.4]))
                        .with_named_variable(&b, "B", &[a], Initialization::Table(vec![0.8, 0.2, 0.1, 0.9]))
                        .with_named_variable(&c, "C", &[b], Initialization::Table(vec![0.7, 0.3, 0.5, 0.5]))
                        .build()
                        .unwrap();

        (a, b, c, model)
    }

    #[test]
    fn eliminate_one() {
        let (a, b, _, model) = chain();

        let factors = eliminate_variable(&b, model.factors().to_vec()).unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].scope(), &[a]);
        let last = &factors[1];
        assert_eq!(last.len(), 4);
        assert!(!last.contains(&b));
    }

    #[test]
    fn eliminate_absent() {
        let (_, _, _, model) = chain();
        let other = Variable::binary();

        let factors = eliminate_variable(&other, model.factors().to_vec()).unwrap();
        assert_eq!(factors, model.factors().to_vec());
    }

    #[test]
    fn explicit_order() {
        let (a, b, c, model) = chain();
        let engine = VariableEliminationEngine::new(&model, &Assignment::new())
                         .unwrap()
                         .with_order(vec![c, b, a]);
        assert_eq!(engine.order(), &EliminationOrder::Explicit(vec![c, b, a]));

        let p = engine.infer(a).unwrap();
        assert!((p.probability(true) - 0.6).abs() < 1e-9);

        let p = engine.infer(c).unwrap();
        assert!((p.probability(true) - 0.604).abs() < 1e-9);
    }

    #[test]
    fn invalid_order() {
        let (a, b, c, model) = chain();
        let evidence = Assignment::new();

        let engine = VariableEliminationEngine::new(&model, &evidence).unwrap().with_order(vec![b]);
        match engine.infer(a) {
            Err(VelimError::InvalidOrder(_)) => (),
            other => panic!("wrong result {:?}", other)
        };

        let engine = VariableEliminationEngine::new(&model, &evidence).unwrap().with_order(vec![b, c, b]);
        match engine.infer(a) {
            Err(VelimError::InvalidOrder(_)) => (),
            other => panic!("wrong result {:?}", other)
        };

        let stranger = Variable::binary();
        let engine = VariableEliminationEngine::new(&model, &evidence).unwrap().with_order(vec![b, c, stranger]);
        match engine.infer(a) {
            Err(VelimError::UnknownVariable(v)) => assert_eq!(v, stranger),
            other => panic!("wrong result {:?}", other)
        };
    }

    #[test]
    fn inconsistent_query() {
        let (a, _, c, model) = chain();

        let mut evidence = Assignment::new();
        evidence.set(&c, true);
        let engine = VariableEliminationEngine::new(&model, &evidence).unwrap();

        match engine.infer(c) {
            Err(VelimError::InconsistentQuery(v, _)) => assert_eq!(v, c),
            other => panic!("wrong result {:?}", other)
        };

        match engine.infer(Variable::binary()) {
            Err(VelimError::InconsistentQuery(..)) => (),
            other => panic!("wrong result {:?}", other)
        };

        assert!(engine.infer(a).is_ok());
    }

    #[test]
    fn unknown_evidence() {
        let (_, _, _, model) = chain();
        let mut evidence = Assignment::new();
        evidence.set(&Variable::binary(), false);

        assert!(VariableEliminationEngine::new(&model, &evidence).is_err());
    }

    #[test]
    fn query_without_factor() {
        let a = Variable::binary();
        let lonely = Variable::binary();
        let f = Factor::from_vec(vec![a], vec![0.6, 0.4]).unwrap();

        match eliminate(&[a, lonely], &[f], lonely, &Assignment::new()) {
            Err(VelimError::EmptyEliminationSet(v)) => assert_eq!(v, lonely),
            other => panic!("wrong result {:?}", other)
        };
    }

    #[test]
    fn factor_outside_model() {
        let a = Variable::binary();
        let b = Variable::binary();
        let f = Factor::from_vec(vec![a, b], vec![0.25; 4]).unwrap();

        match eliminate(&[a], &[f], a, &Assignment::new()) {
            Err(VelimError::UnknownVariable(v)) => assert_eq!(v, b),
            other => panic!("wrong result {:?}", other)
        };
    }

    #[test]
    fn impossible_evidence() {
        let a = Variable::binary();
        let b = Variable::binary();
        let f_a = Factor::from_vec(vec![a], vec![0.5, 0.5]).unwrap();
        let f_b = Factor::from_vec(vec![a, b], vec![1.0, 0.0, 1.0, 0.0]).unwrap();

        let mut evidence = Assignment::new();
        evidence.set(&b, false);

        match eliminate(&[a, b], &[f_a, f_b], a, &evidence) {
            Err(VelimError::ZeroNormalizer) => (),
            other => panic!("wrong result {:?}", other)
        };
    }

    #[test]
    fn normalizer() {
        let (a, _, c, model) = chain();
        let mut evidence = Assignment::new();
        evidence.set(&c, true);

        let p = eliminate(model.variables(), model.factors(), a, &evidence).unwrap();
        // P(C = true)
        assert!((p.normalizer() - 0.604).abs() < 1e-9);
    }
}
