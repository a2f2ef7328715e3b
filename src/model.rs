//! Defines a `Model`, a Bayesian network given as an ordered list of boolean `Variable`s and the
//! `Factor`s (usually CPDs) whose product is the joint distribution.

use crate::factor::Factor;
use crate::init::Initialization;
use crate::util::{Result, VelimError};
use crate::variable::{Assignment, Variable};

use bidir_map::BidirMap;


/// Represents a Bayesian Network as a 'bag of factors'.
///
/// # Representation
/// No graph data structure is held. The scope of each `Factor` implicitly defines the edges of
/// the network. The `Variable`s are kept in the order they were added, which is the default
/// elimination order.
pub struct Model {

    /// The `Variable`s of the model, in insertion order
    variables: Vec<Variable>,

    /// The user-defined names of each `Variable`. This is a two way lookup ```(`Variable`->Name)```
    /// and ```(Name->`Variable`)```
    names: BidirMap<Variable, String>,

    /// The `Factor`s whose product is the (unnormalized) joint distribution
    factors: Vec<Factor>

}


impl Model {

    /// Lookup a `Variable` in the `Model` based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }

    /// Lookup a `Variable`'s name in the `Model`.
    pub fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.get_by_first(var)
    }

    /// Get the `Variable`s in the model, in order
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Get the `Factor`s of the model
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Get the number of `Variable`s in the the `Model`
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.variables.contains(var)
    }

    /// Condition the `Model` given the evidence.
    ///
    /// # Args
    /// * `evidence`: a partial `Assignment` of the `Variable`s in this `Model`.
    ///
    /// # Returns:
    /// a new `Model` over ```self.variables() - evidence.keys()``` whose factors are restricted
    /// by the evidence. The product of its factors is proportional to
    /// ```P(self.variables() - evidence.keys() | evidence)```.
    ///
    /// # Errors
    /// * `VelimError::UnknownVariable`, if the evidence mentions a `Variable` not in the model
    pub fn condition(&self, evidence: &Assignment) -> Result<Model> {
        if let Some(v) = evidence.variables().find(|v| !self.contains(v)) {
            return Err(VelimError::UnknownVariable(*v));
        }

        let factors = self.factors
                          .iter()
                          .map(|f| f.restrict(&evidence.restricted_to(f.scope())))
                          .collect();

        let variables: Vec<Variable> = self.variables
                                           .iter()
                                           .filter(|v| !evidence.contains(v))
                                           .cloned()
                                           .collect();

        let mut names = BidirMap::new();
        for v in variables.iter() {
            if let Some(name) = self.lookup_name(v) {
                names.insert(*v, name.clone());
            }
        }

        Ok(Model { variables, names, factors })
    }

    /// Determine the probability of a full `Assignment` to the `Variable`s in the `Model`.
    ///
    /// Specifically, this computes ```P(zeta)``` by the chain rule, where ```zeta``` is a full
    /// assignment.
    ///
    /// # Errors
    /// * `VelimError::IncompleteAssignment`, if a `Variable` of some factor is unassigned
    pub fn probability(&self, assignment: &Assignment) -> Result<f64> {
        self.factors
            .iter()
            .map(|f| f.value(assignment))
            .product()
    }
}


/// An implementation of the [builder pattern] for creating a `Model`.
///
/// CPDs must be added in topological order: parents are required to be in the model already.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct ModelBuilder {

    /// The `Variable`s added so far
    variables: Vec<Variable>,

    /// The names of each `Variable`
    names: BidirMap<Variable, String>,

    /// The `Factor`s added so far
    factors: Vec<Factor>,

    /// The error state of the builder
    err: Option<VelimError>

}


impl ModelBuilder {

    /// Construct a new `ModelBuilder` representing an empty `Model`
    pub fn new() -> Self {
        ModelBuilder {
            variables: Vec::new(),
            names: BidirMap::new(),
            factors: Vec::new(),
            err: None
        }
    }

    /// Add an anonymous `Variable` to the `Model`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the parent variables. The parents must already be in the model.
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(self, var: &Variable, parents: &[Variable], init: Initialization) -> Self {
        self.add_variable(var, var.to_string(), parents, init)
    }

    /// Add a named `Variable` to the `Model`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `name`: the name for the variable.
    /// * `parents`: the parent variables. The parents must already be in the model.
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_named_variable(
        self,
        var: &Variable,
        name: &str,
        parents: &[Variable],
        init: Initialization,
    ) -> Self {
        self.add_variable(var, String::from(name), parents, init)
    }

    /// Add a `Variable` without a CPD of its own. Its distribution is then carried by factors
    /// added with `with_factor`.
    pub fn with_bare_variable(mut self, var: &Variable, name: &str) -> Self {
        if self.err.is_none() {
            self.register(var, String::from(name));
        }
        self
    }

    /// Add a pre-built `Factor`. Every `Variable` in its scope must already be in the model.
    pub fn with_factor(mut self, factor: Factor) -> Self {
        if self.err.is_some() {
            return self;
        }

        if let Some(v) = factor.scope().iter().find(|v| !self.variables.contains(v)) {
            self.err = Some(VelimError::UnknownVariable(*v));
            return self;
        }

        self.factors.push(factor);
        self
    }

    /// Complete building the model.
    ///
    /// # Returns
    /// the `Model`, or the first error generated during the building process
    pub fn build(self) -> Result<Model> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(Model { variables: self.variables, names: self.names, factors: self.factors })
        }
    }

    fn register(&mut self, var: &Variable, name: String) {
        if self.variables.contains(var) {
            self.err = Some(VelimError::DuplicateVariable(*var));
            return;
        }
        self.variables.push(*var);
        self.names.insert(*var, name);
    }

    /// Internal function that actually does the variable addition to the model
    fn add_variable(
        mut self,
        var: &Variable,
        name: String,
        parents: &[Variable],
        init: Initialization,
    ) -> Self {
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        // 2) Check for error conditions
        if let Some(p) = parents.iter().find(|p| !self.variables.contains(p)) {
            self.err = Some(VelimError::MissingParent(*p));
            return self;
        }

        // 3) Build the factor based on the initialization
        let factor = match init.build_cpd(*var, parents) {
            Ok(f) => f,
            Err(e) => {
                self.err = Some(e);
                return self;
            }
        };

        // 4) Add to current model
        self.register(var, name);
        if self.err.is_none() {
            self.factors.push(factor);
        }

        self
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::all_assignments;

    #[test]
    fn build_empty() {
        let model = ModelBuilder::new().build().unwrap();

        assert_eq!(model.num_variables(), 0);
        assert!(model.variables().is_empty());
        assert!(model.factors().is_empty());
    }

    #[test]
    fn build_named() {
        let v = Variable::binary();
        let model = ModelBuilder::new()
                        .with_named_variable(&v, "foo", &[], Initialization::Uniform)
                        .build()
                        .unwrap();

        assert_eq!(model.variables(), &[v]);
        assert_eq!(model.lookup_name(&v).unwrap(), "foo");
        assert_eq!(model.lookup_variable("foo"), Some(&v));
        assert_eq!(model.lookup_variable("bar"), None);
        assert_eq!(model.factors()[0].scope(), &[v]);
    }

    #[test]
    fn build_anonymous() {
        let v = Variable::binary();
        let model = ModelBuilder::new()
                        .with_variable(&v, &[], Initialization::Binomial(0.2))
                        .build()
                        .unwrap();

        assert_eq!(model.lookup_name(&v).unwrap(), &v.to_string());
    }

    #[test]
    fn build_errs() {
        let a = Variable::binary();
        let b = Variable::binary();

        let res = ModelBuilder::new()
                      .with_variable(&b, &[a], Initialization::Uniform)
                      .build();
        match res {
            Err(VelimError::MissingParent(v)) => assert_eq!(v, a),
            _ => panic!("expected a missing parent")
        };

        let res = ModelBuilder::new()
                      .with_variable(&a, &[], Initialization::Uniform)
                      .with_variable(&a, &[], Initialization::Uniform)
                      .build();
        match res {
            Err(VelimError::DuplicateVariable(v)) => assert_eq!(v, a),
            _ => panic!("expected a duplicate variable")
        };

        let res = ModelBuilder::new()
                      .with_bare_variable(&a, "a")
                      .with_factor(Factor::from_vec(vec![a, b], vec![0.25; 4]).unwrap())
                      .build();
        match res {
            Err(VelimError::UnknownVariable(v)) => assert_eq!(v, b),
            _ => panic!("expected an unknown variable")
        };
    }

    #[test]
    fn probability() {
        let i = Variable::binary();
        let s = Variable::binary();

        let model = ModelBuilder::new()
                        .with_named_variable(&i, "I", &[], Initialization::Binomial(0.7))
                        .with_named_variable(&s, "S", &[i], Initialization::Table(vec![0.95, 0.05, 0.2, 0.8]))
                        .build()
                        .unwrap();

        let expected = [0.7 * 0.95, 0.7 * 0.05, 0.3 * 0.2, 0.3 * 0.8];
        for (assn, &p) in all_assignments(model.variables()).zip(expected.iter()) {
            assert!((model.probability(&assn).unwrap() - p).abs() < 1e-12);
        }

        let total: f64 = all_assignments(model.variables())
                             .map(|a| model.probability(&a).unwrap())
                             .sum();
        assert!((total - 1.0).abs() < 1e-12);

        // partial assignment
        let mut a = Assignment::new();
        a.set(&i, true);
        assert!(model.probability(&a).is_err());
    }

    #[test]
    fn condition() {
        let i = Variable::binary();
        let s = Variable::binary();

        let model = ModelBuilder::new()
                        .with_named_variable(&i, "I", &[], Initialization::Binomial(0.7))
                        .with_named_variable(&s, "S", &[i], Initialization::Table(vec![0.95, 0.05, 0.2, 0.8]))
                        .build()
                        .unwrap();

        let mut evidence = Assignment::new();
        evidence.set(&i, true);
        let conditioned = model.condition(&evidence).unwrap();

        assert_eq!(conditioned.variables(), &[s]);
        assert_eq!(conditioned.lookup_variable("S"), Some(&s));
        assert_eq!(conditioned.lookup_variable("I"), None);
        assert!(conditioned.factors()[0].is_scalar());

        for (value, expected) in vec![(true, 0.7 * 0.95), (false, 0.7 * 0.05)] {
            let mut a = Assignment::new();
            a.set(&s, value);
            assert!((conditioned.probability(&a).unwrap() - expected).abs() < 1e-12);
        }

        // the original model is untouched
        assert_eq!(model.factors()[1].scope(), &[i, s]);

        let mut bad = Assignment::new();
        bad.set(&Variable::binary(), true);
        assert!(model.condition(&bad).is_err());
    }
}
