//! Exact inference in boolean Bayesian networks by variable elimination.
//!
//! A network is a set of `Factor`s over boolean `Variable`s. Each factor stores a flat table
//! whose row index encodes one joint assignment, one bit per variable. Inference restricts the
//! factors by the evidence, eliminates every other non-query variable by multiplication and
//! marginalization, and normalizes what is left into a `Posterior`.

pub mod variable;
pub mod factor;
pub mod init;
pub mod model;
pub mod inference;
pub mod util;

pub use crate::factor::{Factor, Table};
pub use crate::factor::ops::{join, multiply_batch, sum_out};
pub use crate::inference::{
    eliminate, eliminate_variable, ConditionalInferenceEngine, EliminationOrder, Posterior,
    VariableEliminationEngine
};
pub use crate::init::Initialization;
pub use crate::model::{Model, ModelBuilder};
pub use crate::util::{Result, VelimError};
pub use crate::variable::{all_assignments, Assignment, Variable, DOMAIN};
