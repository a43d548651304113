/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Random pauses of the workers of a parallel solver.
///
/// Before each sweep over its part, a worker sleeps for `duration` with
/// the given probability, simulating a thread that is descheduled or slowed
/// down by other load. The synchronized solver waits for such stragglers at
/// every iteration, whereas the barrier-free one lets the other workers go
/// on.
///
/// Every worker draws from its own [pseudorandom number generator](SmallRng),
/// seeded from `seed` and the index of the worker (see [`worker_rng`]), so
/// the sequence of pauses of each worker is reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomSleep {
    /// How long a pause lasts.
    pub duration: Duration,
    /// The probability of pausing before a sweep.
    pub probability: f64,
    /// The seed of the generators of the workers.
    pub seed: u64,
}

impl RandomSleep {
    /// Creates a new sleep policy.
    ///
    /// # Panics
    ///
    /// Panics if `probability` is not in [0 . . 1].
    pub fn new(duration: Duration, probability: f64, seed: u64) -> Self {
        let sleep = Self {
            duration,
            probability,
            seed,
        };
        sleep.check();
        sleep
    }

    /// Checks that the probability is in [0 . . 1].
    ///
    /// # Panics
    ///
    /// Panics if the probability is not in [0 . . 1].
    pub fn check(&self) {
        assert!(
            (0.0..=1.0).contains(&self.probability),
            "The sleep probability must be in [0 . . 1], got {}",
            self.probability
        );
    }

    /// Sleeps for the duration of the policy with its probability, and
    /// returns whether it slept.
    pub fn maybe_sleep<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        if rng.random::<f64>() >= self.probability {
            return false;
        }
        std::thread::sleep(self.duration);
        true
    }
}

/// Returns the pseudorandom number generator of the given worker.
pub fn worker_rng(seed: u64, worker: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed.wrapping_add(worker as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_probability_bounds() {
        let mut rng = worker_rng(0, 0);
        let never = RandomSleep::new(Duration::from_secs(10), 0.0, 0);
        assert!((0..1000).all(|_| !never.maybe_sleep(&mut rng)));

        let always = RandomSleep::new(Duration::from_millis(2), 1.0, 0);
        let start = Instant::now();
        assert!(always.maybe_sleep(&mut rng));
        assert!(start.elapsed() >= Duration::from_millis(2));
    }

    #[test]
    fn test_workers_are_reproducible() {
        let sleep = RandomSleep::new(Duration::ZERO, 0.5, 42);
        let pauses = |worker| {
            let mut rng = worker_rng(sleep.seed, worker);
            (0..64).map(|_| sleep.maybe_sleep(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(pauses(1), pauses(1));
        assert_ne!(pauses(0), pauses(1));
    }

    #[test]
    #[should_panic(expected = "sleep probability")]
    fn test_invalid_probability() {
        RandomSleep::new(Duration::ZERO, 1.5, 0);
    }
}
