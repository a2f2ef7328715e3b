//! Operations over `Factor`s used by variable elimination: the product of two factors on a shared
//! variable, the product of every factor that mentions a variable, and marginalization.

use super::{layout, Factor, Table};
use crate::util::{Result, VelimError};
use crate::variable::Variable;

/// Product of two `Factor`s that share the `Variable` `var`.
///
/// Row ```i``` of `a` is paired with every row ```j``` of `b` in which `var` takes the same
/// value, in ascending order of ```i``` and then ```j```. The scope of the result is the scope of
/// `a` followed by the scope of `b` without `var`.
///
/// # Errors
/// * `VelimError::UnknownVariable`, if `var` is missing from either scope
/// * `VelimError::MultipleSharedVariables`, if the scopes intersect in more than `var`. Pairing
///   rows on `var` alone would not keep the other shared variables consistent.
pub fn join(var: &Variable, a: &Factor, b: &Factor) -> Result<Factor> {
    let pos_a = a.position(var)?;
    let pos_b = b.position(var)?;

    let shared: Vec<Variable> = a.scope()
                                 .iter()
                                 .filter(|v| *v != var && b.contains(v))
                                 .cloned()
                                 .collect();
    if !shared.is_empty() {
        return Err(VelimError::MultipleSharedVariables { var: *var, shared });
    }

    let width_a = a.scope().len();
    let width_b = b.scope().len();

    let mut values = Vec::with_capacity(a.len() * b.len() / 2);
    for (i, &x) in a.table().iter().enumerate() {
        let bit = layout::bit_at(i, pos_a, width_a);
        for (j, &y) in b.table().iter().enumerate() {
            if layout::bit_at(j, pos_b, width_b) == bit {
                values.push(x * y);
            }
        }
    }

    let scope: Vec<Variable> = a.scope()
                                .iter()
                                .chain(b.scope().iter().filter(|v| *v != var))
                                .cloned()
                                .collect();

    Factor::new(scope, Table::from(values))
}


/// Multiply together every `Factor` in `factors` that contains `var`, folding `join` from the left
/// in the order the factors are given.
///
/// # Errors
/// * `VelimError::EmptyEliminationSet`, if no factor contains `var`
pub fn multiply_batch<'a, I>(var: &Variable, factors: I) -> Result<Factor>
    where I: IntoIterator<Item = &'a Factor>
{
    let mut containing = factors.into_iter().filter(|f| f.contains(var));

    let first = containing.next().ok_or(VelimError::EmptyEliminationSet(*var))?;
    containing.try_fold(first.clone(), |acc, f| join(var, &acc, f))
}


/// Marginalize `var` out of `factor` by summing each pair of rows that differ only in the bit of
/// `var`.
///
/// The pairs are visited in ascending order of their first row, which is also the row order of
/// the result.
///
/// # Errors
/// * `VelimError::UnknownVariable`, if `var` is not in the scope of `factor`
pub fn sum_out(var: &Variable, factor: &Factor) -> Result<Factor> {
    let pos = factor.position(var)?;
    let mask = layout::mask(pos, factor.scope().len());
    let table = factor.table();

    let values: Vec<f64> = (0..table.len())
        .filter(|row| row & mask == 0)
        .map(|row| table[row] + table[row ^ mask])
        .collect();

    let scope: Vec<Variable> = factor.scope()
                                     .iter()
                                     .filter(|v| *v != var)
                                     .cloned()
                                     .collect();

    Factor::new(scope, Table::from(values))
}
