//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The probability `p` must be in the range `(0, 1)`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `n`, then
/// the probability that it is present at level `n + 1` is some constant `p` in
/// `(0, 1)`. Each promotion is an independent coin toss, so the probability
/// that a node reaches level `n` is `p^n`, truncated at the maximum number of
/// levels allowed.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be greater or
    /// equal to 1.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Toss a fair-ish coin until it comes up "stop" or the level cap is
    /// reached, so that a level `n` is produced with probability `p^n`.
    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.random::<f64>() < self.p {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError};
    use crate::level_generator::LevelGenerator;

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
    }

    #[test]
    fn invalid_p() {
        assert_eq!(
            Geometric::new(1, 0.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1, 1.0).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Geometric::new(0, 0.5).unwrap_err().to_string(),
            "max must be non-zero."
        );
        assert_eq!(
            Geometric::new(16, 1.0).unwrap_err().to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn single_level() -> Result<()> {
        let mut generator = Geometric::new(1, 0.5)?;
        assert_eq!(generator.total(), 1);
        for _ in 0..1_000 {
            assert_eq!(generator.level(), 0);
        }
        Ok(())
    }

    #[rstest]
    fn new(
        #[values(1, 2, 16, 32)] n: usize,
        #[values(0.01, 0.1, 0.5, 0.99)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..n).contains(&level));
        }
        // Make sure that we can produce at least one level-0 node, and one at
        // the maximum level. The latter is only checked when the expected
        // number of hits over the sample is comfortably high.
        let mut found = false;
        for _ in 0..1_000_000 {
            if generator.level() == 0 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a level-0 node.");
        }

        let top_probability = p.powi(i32::try_from(n - 1)?);
        if top_probability * 1_000_000.0 >= 100.0 {
            found = false;
            for _ in 0..1_000_000 {
                if generator.level() == n - 1 {
                    found = true;
                    break;
                }
            }
            if !found {
                bail!("Failed to generate a level-{} node.", n - 1);
            }
        }

        Ok(())
    }
}
