//! Shuffling and replacing the array
//!
//! These go through the same [`Tracked`] instrumentation as the sorting algorithms, so a front end
//! renders a shuffle exactly like a sort.

use rand::Rng;

use crate::instrument::{Observer, Step, Tracked};

/// Unbiased Fisher-Yates shuffle, one shuffle step per position from the back
pub fn shuffle<O: Observer + ?Sized, R: Rng + ?Sized>(
    values: &mut Tracked<'_, O>,
    rng: &mut R,
) -> Step {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.shuffle_swap(i, j)?;
    }

    Ok(())
}

/// Check that `values` can be handed to the engine
pub fn validate(values: &[i64]) -> crate::Result<()> {
    if values.is_empty() {
        return Err(crate::Error::InvalidInput(
            "the sequence to sort must not be empty".to_owned(),
        ));
    }

    Ok(())
}

/// Check the arguments of a resize
pub fn check_resize(length: usize, max_value: i64) -> crate::Result<()> {
    if length == 0 {
        return Err(crate::Error::InvalidInput(
            "the length must be positive".to_owned(),
        ));
    }
    if max_value < 1 {
        return Err(crate::Error::InvalidInput(format!(
            "the maximum value must be positive, got {max_value}"
        )));
    }

    Ok(())
}

/// A fresh random sequence for a resize, values drawn from `1..=max_value`
pub fn generate<R: Rng + ?Sized>(
    length: usize,
    max_value: i64,
    rng: &mut R,
) -> crate::Result<Vec<i64>> {
    check_resize(length, max_value)?;

    crate::data::uniform(length, max_value, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        instrument::{Counters, EventKind},
        test::{Recorder, test_rng},
    };

    fn shuffled(values: &mut [i64], rng: &mut crate::test::Rng) -> (Counters, Recorder) {
        let mut counters = Counters::default();
        let mut recorder = Recorder::default();
        shuffle(&mut Tracked::new(values, &mut counters, &mut recorder), rng).unwrap();

        (counters, recorder)
    }

    #[test]
    fn shuffle_keeps_the_multiset() {
        let mut rng = test_rng();

        for _ in 0..1_000 {
            let mut values = [1, 2, 3, 4, 5];
            let (counters, recorder) = shuffled(&mut values, &mut rng);

            let mut sorted = values;
            sorted.sort_unstable();
            assert_eq!(sorted, [1, 2, 3, 4, 5]);

            // Every shuffle step is a swap, nothing is compared
            assert_eq!(
                counters,
                Counters {
                    comparisons: 0,
                    swaps: 4,
                    overwrites: 0,
                }
            );
            assert_eq!(recorder.steps.len(), 4);
            assert!(
                recorder
                    .kinds()
                    .iter()
                    .all(|kind| matches!(kind, EventKind::ShuffleStep(..)))
            );
        }
    }

    #[test]
    fn shuffle_is_roughly_uniform() {
        const TRIALS: usize = 50_000;
        let mut rng = test_rng();
        let mut frequencies = [[0usize; 5]; 5];

        for _ in 0..TRIALS {
            let mut values = [1, 2, 3, 4, 5];
            shuffled(&mut values, &mut rng);
            for (position, value) in values.iter().enumerate() {
                frequencies[position][*value as usize - 1] += 1;
            }
        }

        // Each value should land in each position about a fifth of the time
        let expected = TRIALS / 5;
        for row in frequencies {
            for count in row {
                assert!(
                    count.abs_diff(expected) < expected / 10,
                    "{count} is too far from {expected}"
                );
            }
        }
    }

    #[test]
    fn shuffle_trivial() {
        let mut rng = test_rng();

        let (_, recorder) = shuffled(&mut [], &mut rng);
        assert!(recorder.steps.is_empty());

        let mut values = [9];
        let (_, recorder) = shuffled(&mut values, &mut rng);
        assert!(recorder.steps.is_empty());
        assert_eq!(values, [9]);
    }

    #[test]
    fn validation() {
        assert!(validate(&[1]).is_ok());
        assert!(matches!(validate(&[]), Err(crate::Error::InvalidInput(_))));
    }

    #[test]
    fn generate_checks_arguments() {
        let mut rng = test_rng();

        let values = generate(20, 5, &mut rng).unwrap();
        assert_eq!(values.len(), 20);
        assert!(values.iter().all(|value| (1..=5).contains(value)));

        assert!(matches!(
            generate(0, 5, &mut rng),
            Err(crate::Error::InvalidInput(_))
        ));
        assert!(matches!(
            generate(5, 0, &mut rng),
            Err(crate::Error::InvalidInput(_))
        ));
        assert!(matches!(
            generate(5, -3, &mut rng),
            Err(crate::Error::InvalidInput(_))
        ));
    }
}
