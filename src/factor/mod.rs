//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of boolean `Variable`s as a flat table
//! with one weight per joint assignment. The order of the scope defines the bit layout of the
//! table (see `layout`).

use crate::util::{Result, VelimError};
use crate::variable::{Assignment, Variable};

use itertools::Itertools;
use ndarray::prelude as nd;

use std::fmt;

pub mod layout;
pub mod ops;

/// Alias f64 ndarray::Array1 as Table
pub type Table = nd::Array1<f64>;

/// Tolerance used when checking that a conditional distribution is normalized
const CPD_TOLERANCE: f64 = 1e-6;


#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The scope of the `Factor`. Position ```i``` owns the ```i```-th most significant bit of a
    /// row index.
    scope: Vec<Variable>,

    /// The values of the `Factor` table, ```2^scope.len()``` of them
    table: Table,

    /// The observations that were applied to this `Factor` by restriction
    observations: Assignment
}


impl Factor {

    /// Create a new `Factor`
    ///
    /// # Errors
    /// * `VelimError::StructuralMismatch`, if the table does not hold ```2^scope.len()``` rows
    /// * `VelimError::DuplicateVariable`, if a `Variable` appears twice in the scope
    /// * `VelimError::NegativeValue`, if a weight is negative or not finite
    pub fn new(scope: Vec<Variable>, table: Table) -> Result<Self> {
        if let Some(&dup) = scope.iter().duplicates().next() {
            return Err(VelimError::DuplicateVariable(dup));
        }

        let expected = layout::row_count(scope.len());
        if expected != Some(table.len()) {
            return Err(VelimError::StructuralMismatch {
                variables: scope.len(),
                expected: expected.unwrap_or(usize::MAX),
                got: table.len()
            });
        }

        if let Some(&bad) = table.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(VelimError::NegativeValue(bad));
        }

        Ok(Factor { scope, table, observations: Assignment::new() })
    }

    /// Create a new `Factor` from a plain vector of weights
    pub fn from_vec(scope: Vec<Variable>, values: Vec<f64>) -> Result<Self> {
        Factor::new(scope, Table::from(values))
    }

    /// Create a conditional probability distribution ```P(var | parents)```.
    ///
    /// The scope of the result is ```parents ++ [var]```, so every pair of consecutive rows is
    /// the distribution of `var` for one assignment to the parents. Each of those pairs must sum
    /// to one.
    pub fn cpd(var: Variable, parents: Vec<Variable>, table: Table) -> Result<Self> {
        let mut scope = parents;
        scope.push(var);
        let factor = Factor::new(scope, table)?;

        for (row, pair) in factor.table.as_slice().unwrap_or(&[]).chunks(2).enumerate() {
            let sum: f64 = pair.iter().sum();
            if (sum - 1.0).abs() > CPD_TOLERANCE {
                return Err(VelimError::NotACpd { row: row * 2, sum });
            }
        }

        Ok(factor)
    }

    /// Retrieve the scope of the `Factor`.
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }

    /// Retrieve the table of the `Factor`.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The observations that have been applied to this `Factor`
    pub fn observations(&self) -> &Assignment {
        &self.observations
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` if the `Factor` has an empty scope, i.e. it holds a single constant weight
    pub fn is_scalar(&self) -> bool {
        self.scope.is_empty()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.scope.contains(var)
    }

    /// Position of `var` in the scope
    ///
    /// # Errors
    /// * `VelimError::UnknownVariable`, if `var` is not in the scope
    pub fn position(&self, var: &Variable) -> Result<usize> {
        self.scope
            .iter()
            .position(|v| v == var)
            .ok_or(VelimError::UnknownVariable(*var))
    }

    /// The bit (0 or 1) that `var` holds in row `row`.
    ///
    /// The width of the row index is the current size of the scope.
    pub fn bit_value(&self, var: &Variable, row: usize) -> Result<usize> {
        let pos = self.position(var)?;
        Ok(layout::bit_at(row, pos, self.scope.len()))
    }

    /// The value of `var` in row `row`
    pub fn state(&self, var: &Variable, row: usize) -> Result<bool> {
        self.bit_value(var, row).map(layout::decode)
    }

    /// The row of the table selected by `assignment`.
    ///
    /// # Errors
    /// * `VelimError::IncompleteAssignment`, if a variable of the scope is not assigned
    pub fn row(&self, assignment: &Assignment) -> Result<usize> {
        let bits = self.scope
                       .iter()
                       .map(|v| {
                           assignment.get(v)
                                     .map(|&b| layout::encode(b))
                                     .ok_or(VelimError::IncompleteAssignment(*v))
                       })
                       .collect::<Result<Vec<usize>>>()?;
        Ok(layout::row_of(bits))
    }

    /// Retrieve the value for a complete assignment over the scope of this `Factor`. The
    /// assignment may be a superset of the scope.
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let row = self.row(assignment)?;
        Ok(self.table[row])
    }


    /// Restrict the `Factor` to the rows consistent with `observations` and drop the observed
    /// variables from the scope.
    ///
    /// All observed variables are checked against each row of the original table at the
    /// original width in one pass, and then removed together. Observations about variables
    /// outside the scope are ignored.
    pub fn restrict(&self, observations: &Assignment) -> Factor {
        let width = self.scope.len();
        let observed: Vec<(usize, usize)> = self.scope
                                                .iter()
                                                .enumerate()
                                                .filter_map(|(pos, v)| {
                                                    observations.get(v)
                                                                .map(|&b| (pos, layout::encode(b)))
                                                })
                                                .collect();

        if observed.is_empty() {
            return self.clone();
        }

        let table: Table = self.table
                               .iter()
                               .enumerate()
                               .filter(|&(row, _)| {
                                   observed.iter()
                                           .all(|&(pos, bit)| layout::bit_at(row, pos, width) == bit)
                               })
                               .map(|(_, &v)| v)
                               .collect();

        let scope: Vec<Variable> = self.scope
                                       .iter()
                                       .filter(|v| !observations.contains(*v))
                                       .cloned()
                                       .collect();

        let mut applied = self.observations.clone();
        for (v, &b) in observations.iter().filter(|(v, _)| self.scope.contains(*v)) {
            applied.set(v, b);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "restricted factor over {} variables to {} ({} rows kept)",
            width,
            scope.len(),
            table.len()
        );

        Factor { scope, table, observations: applied }
    }
}


impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Factor({}) [{}]", self.scope.iter().join(", "), self.table.iter().join(", "))
    }
}
