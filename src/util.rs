//! Defines the `Error` type for the velim library

use crate::variable::Variable;

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, VelimError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum VelimError {

    /// The table of a `Factor` does not hold ```2^n``` rows for a scope of ```n``` variables
    #[error("table has {got} rows, but a scope of {variables} variables requires {expected}")]
    StructuralMismatch { variables: usize, expected: usize, got: usize },

    /// A `Variable` was required in a scope (or a model) where it is absent
    #[error("variable {0} is not in scope")]
    UnknownVariable(Variable),

    /// No `Factor` mentions the `Variable` that should be multiplied out
    #[error("no factor contains variable {0}")]
    EmptyEliminationSet(Variable),

    /// The query variable is observed, or is not part of the model
    #[error("inconsistent query on {0}: {1}")]
    InconsistentQuery(Variable, &'static str),

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable {0} was encountered twice")]
    DuplicateVariable(Variable),

    /// Two factors were joined on `var` but also share the variables in `shared`
    #[error("join on {var} requires it to be the only shared variable, but {shared:?} are shared too")]
    MultipleSharedVariables { var: Variable, shared: Vec<Variable> },

    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("missing an assignment to variable {0}")]
    IncompleteAssignment(Variable),

    /// A factor weight was negative or not finite
    #[error("factor weights must be finite and non-negative, found {0}")]
    NegativeValue(f64),

    /// Represents the situation when we expected a CPD but did not receive one
    #[error("conditional distribution at row {row} sums to {sum}")]
    NotACpd { row: usize, sum: f64 },

    /// An observed variable survived the restriction phase
    #[error("observed variable {0} is still in the scope of a factor")]
    ResidualObservation(Variable),

    /// The elimination order does not cover the model
    #[error("invalid elimination order: {0}")]
    InvalidOrder(String),

    /// The evidence has probability zero under the model
    #[error("cannot normalize a posterior with a partition of zero")]
    ZeroNormalizer,

    /// Represents an error where there was a parent variable expected, but not found
    #[error("parent variable {0} is missing from the model")]
    MissingParent(Variable),

    /// Represents an attempt to initialize a variable with an incompatible Initialization
    #[error("invalid initialization: {0}")]
    InvalidInitialization(&'static str),

}
