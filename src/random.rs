//! Random number generation and sampling primitives.
//!
//! Every simulator takes its generator as an explicit `&mut R` parameter;
//! nothing in this crate touches a global RNG.
//!
//! # Reproducibility
//!
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use u_montecarlo::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Draws a fresh seed from the operating system, for runs that do not
/// request a fixed one.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// One fair left/right deflection: `true` means a step to the right.
///
/// Uses the generator's most significant bit, like `rng.random::<bool>()`.
#[inline]
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random::<bool>()
}

/// Picks two distinct indices uniformly from `[0, len)`, without
/// replacement.
///
/// Every ordered pair `(i, j)` with `i != j` is equally likely.
///
/// # Algorithm
/// Draw `i` from `[0, len)` and `j'` from `[0, len − 1)`, then skip over
/// `i` by mapping `j' ≥ i` to `j' + 1`. Two draws, no rejection loop.
///
/// # Returns
/// - `None` if `len < 2`.
///
/// # Examples
/// ```
/// use u_montecarlo::random::{create_rng, choose_two_distinct};
/// let mut rng = create_rng(7);
/// let (i, j) = choose_two_distinct(10, &mut rng).unwrap();
/// assert!(i < 10 && j < 10 && i != j);
/// assert_eq!(choose_two_distinct(1, &mut rng), None);
/// ```
pub fn choose_two_distinct<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    Some((first, second))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        let vals1: Vec<f64> = (0..10).map(|_| rng1.random()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.random()).collect();
        assert_eq!(vals1, vals2);
    }

    #[test]
    fn test_choose_two_distinct_pair_of_two() {
        let mut rng = create_rng(3);
        for _ in 0..100 {
            let (i, j) = choose_two_distinct(2, &mut rng).unwrap();
            assert!((i, j) == (0, 1) || (i, j) == (1, 0));
        }
    }

    #[test]
    fn test_choose_two_distinct_too_small() {
        let mut rng = create_rng(3);
        assert_eq!(choose_two_distinct(0, &mut rng), None);
        assert_eq!(choose_two_distinct(1, &mut rng), None);
    }

    #[test]
    fn test_choose_two_distinct_uniform_pairs() {
        // 4 elements -> 12 ordered pairs, each with probability 1/12
        let mut rng = create_rng(42);
        let mut counts = [[0u32; 4]; 4];
        let n = 60_000;
        for _ in 0..n {
            let (i, j) = choose_two_distinct(4, &mut rng).unwrap();
            counts[i][j] += 1;
        }
        let expected = n as f64 / 12.0;
        for (i, row) in counts.iter().enumerate() {
            for (j, &c) in row.iter().enumerate() {
                if i == j {
                    assert_eq!(c, 0);
                } else {
                    let dev = (c as f64 - expected).abs() / expected;
                    assert!(dev < 0.06, "pair ({i},{j}) count {c}, expected ~{expected}");
                }
            }
        }
    }

    #[test]
    fn test_coin_flip_is_fair() {
        let mut rng = create_rng(11);
        let n = 20_000;
        let heads = (0..n).filter(|_| coin_flip(&mut rng)).count();
        let ratio = heads as f64 / n as f64;
        assert!((ratio - 0.5).abs() < 0.02, "ratio {ratio}");
    }
}
