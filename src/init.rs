//! Module containing initialization routines for the parameters of a model.

use crate::factor::{layout, Factor, Table};
use crate::util::{Result, VelimError};
use crate::variable::Variable;

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Defines possible ways to initialize a `Variable`s CPD.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// A uniform distribution over both values, for every assignment to the parents
    Uniform,

    /// Initialize the CPD as a Binomial distribution with parameter ```p = P(true)```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Binomial(f64),

    /// User defined CPD, laid out over ```parents ++ [var]```
    Table(Vec<f64>),

    /// Randomly initialize the weights of the CPD.
    Random,

    /// Randomly initialize the weights of the CPD from a seeded generator, so the same seed
    /// always yields the same CPD.
    Seeded(u64)
}


impl Initialization {

    /// Construct a CPD, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the dependent `Variable`
    /// * `parents`: the conditioning `Variable`s
    ///
    /// # Returns
    /// a `Factor` with scope ```parents ++ [var]```, initialized according to ```self```.
    pub fn build_cpd(self, var: Variable, parents: &[Variable]) -> Result<Factor> {
        let rows = layout::row_count(parents.len())
            .ok_or(VelimError::InvalidInitialization("too many parents"))?;
        let shape = (rows, var.cardinality());

        let tbl: Table = match self {
            Initialization::Uniform => {
                Table::from_elem(rows * var.cardinality(), 1. / (var.cardinality() as f64))
            },
            Initialization::Binomial(p) => {
                if !parents.is_empty() {
                    return Err(VelimError::InvalidInitialization("a binomial CPD cannot have parents"));
                }
                if !(0.0..=1.0).contains(&p) {
                    return Err(VelimError::InvalidInitialization("binomial parameter must be in [0, 1]"));
                }
                Table::from(vec![p, 1.0 - p])
            },
            Initialization::Table(values) => Table::from(values),
            Initialization::Random => {
                let tbl = nd::Array2::random(shape, Uniform::new(1.0, 100.0));
                normalize_rows(tbl)
            },
            Initialization::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let tbl = nd::Array2::random_using(shape, Uniform::new(1.0, 100.0), &mut rng);
                normalize_rows(tbl)
            }
        };

        Factor::cpd(var, parents.to_vec(), tbl)
    }
}

/// Normalize every row of a ```(parent assignments x values)``` table and flatten it
fn normalize_rows(tbl: nd::Array2<f64>) -> Table {
    let z = tbl.sum_axis(nd::Axis(1)).insert_axis(nd::Axis(1));
    (&tbl / &z).iter().cloned().collect()
}
