//! Removable multiset of clip chain lengths.
//!
//! Backs the paper-clip experiment: a population of chains that shrinks by
//! one element every time two chains are joined.
//!
//! # Algorithm
//!
//! Chains live in a dense `Vec`. Joining `i` and `j` adds the length of `j`
//! into `i` and removes `j` with **swap-and-truncate** (`Vec::swap_remove`),
//! so each merge is O(1) instead of the O(n) shift of an ordered removal.
//! Element order is not meaningful; only the multiset of lengths is, and a
//! uniform pick of two distinct positions stays a uniform pick of two
//! distinct chains after any number of swaps.

use rand::Rng;

use crate::random;

/// Population of clip chains, each identified only by its length.
///
/// # Examples
/// ```
/// use u_montecarlo::collections::ClipPool;
///
/// let mut pool = ClipPool::new(5);
/// assert_eq!(pool.len(), 5);
/// assert_eq!(pool.total_length(), 5);
///
/// pool.merge(0, 3);
/// assert_eq!(pool.len(), 4);
/// assert_eq!(pool.total_length(), 5); // joining never creates or loses clips
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPool {
    lengths: Vec<u64>,
}

impl ClipPool {
    /// Creates a pool of `num_clips` single clips.
    ///
    /// # Complexity
    /// O(n)
    pub fn new(num_clips: usize) -> Self {
        Self {
            lengths: vec![1; num_clips],
        }
    }

    /// Returns the number of chains.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Returns `true` if the pool holds no chains.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Sum of all chain lengths; invariant under [`merge`](Self::merge).
    pub fn total_length(&self) -> u64 {
        self.lengths.iter().sum()
    }

    /// Current chain lengths, in unspecified order.
    pub fn lengths(&self) -> &[u64] {
        &self.lengths
    }

    /// Joins chain `absorbed` onto chain `keep`, removing `absorbed`.
    ///
    /// Returns the length of the joined chain.
    ///
    /// # Complexity
    /// O(1)
    ///
    /// # Panics
    /// Panics if either index is out of bounds or `keep == absorbed`.
    pub fn merge(&mut self, keep: usize, absorbed: usize) -> u64 {
        assert_ne!(keep, absorbed, "cannot join a chain to itself");
        let joined = self.lengths[keep] + self.lengths[absorbed];
        self.lengths[keep] = joined;
        self.lengths.swap_remove(absorbed);
        joined
    }

    /// Joins two distinct chains chosen uniformly at random.
    ///
    /// Returns the length of the joined chain, or `None` (leaving the pool
    /// untouched) if fewer than two chains remain.
    pub fn merge_random_pair<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u64> {
        let (keep, absorbed) = random::choose_two_distinct(self.len(), rng)?;
        Some(self.merge(keep, absorbed))
    }

    /// Consumes the pool, returning the chain lengths.
    pub fn into_lengths(self) -> Vec<u64> {
        self.lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_new() {
        let pool = ClipPool::new(5);
        assert_eq!(pool.len(), 5);
        assert!(pool.lengths().iter().all(|&l| l == 1));
    }

    #[test]
    fn test_new_empty() {
        let pool = ClipPool::new(0);
        assert!(pool.is_empty());
        assert_eq!(pool.total_length(), 0);
    }

    #[test]
    fn test_merge_last_into_first() {
        let mut pool = ClipPool::new(3);
        assert_eq!(pool.merge(0, 2), 2);
        let mut lengths = pool.lengths().to_vec();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![1, 2]);
    }

    #[test]
    fn test_merge_keeps_last_element() {
        // `keep` is the tail slot that swap_remove relocates.
        let mut pool = ClipPool::new(4);
        pool.merge(0, 1); // [2, 1, 1] in some order
        let last = pool.len() - 1;
        let joined = pool.merge(last, 0);
        assert_eq!(joined, pool.lengths().iter().copied().max().unwrap());
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.total_length(), 4);
    }

    #[test]
    #[should_panic(expected = "cannot join a chain to itself")]
    fn test_merge_self_panics() {
        let mut pool = ClipPool::new(3);
        pool.merge(1, 1);
    }

    #[test]
    fn test_merge_random_pair_exhausts() {
        let mut pool = ClipPool::new(4);
        let mut rng = create_rng(9);
        for _ in 0..3 {
            assert!(pool.merge_random_pair(&mut rng).is_some());
        }
        assert_eq!(pool.lengths(), &[4]);
        assert_eq!(pool.merge_random_pair(&mut rng), None);
        assert_eq!(pool.into_lengths(), vec![4]);
    }
}
