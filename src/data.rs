//! Generators for the sequences to sort

use rand::{Rng, distr::Distribution as _, seq::SliceRandom as _};

/// The upper bound used for generated values when none is given
pub const DEFAULT_MAX_VALUE: i64 = 100;

/// Available data types for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataType {
    /// Values drawn uniformly from `1..=max_value`
    Uniform,
    /// A random permutation of `1..=size`
    Permutation,
    /// `1..=size` in order
    Ascending,
    /// `1..=size` in reverse order
    Descending,
}

impl DataType {
    /// Initialize a vector of the given size, `max_value` only bounds [`DataType::Uniform`]
    pub fn initialize<R: Rng + ?Sized>(
        self,
        size: usize,
        max_value: i64,
        rng: &mut R,
    ) -> crate::Result<Vec<i64>> {
        let ascending = 1..=size as i64;
        Ok(match self {
            DataType::Uniform => uniform(size, max_value, rng)?,
            DataType::Permutation => {
                let mut values: Vec<i64> = ascending.collect();
                values.shuffle(rng);
                values
            }
            DataType::Ascending => ascending.collect(),
            DataType::Descending => ascending.rev().collect(),
        })
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataType::Uniform => "uniform",
            DataType::Permutation => "permutation",
            DataType::Ascending => "ascending",
            DataType::Descending => "descending",
        })
    }
}

/// `size` values drawn uniformly from `1..=max_value`
pub fn uniform<R: Rng + ?Sized>(
    size: usize,
    max_value: i64,
    rng: &mut R,
) -> crate::Result<Vec<i64>> {
    let distribution = rand::distr::Uniform::new_inclusive(1, max_value).map_err(|err| {
        crate::Error::InvalidInput(format!("cannot draw values up to {max_value}: {err}"))
    })?;

    Ok(distribution.sample_iter(rng).take(size).collect())
}
