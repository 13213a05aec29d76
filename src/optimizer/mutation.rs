use crate::layout::SplitLayout;
use fastrand::Rng;
use itertools::Itertools;

/// Number of unordered pairs among `n` free slots.
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Every unordered pair of free slots.
pub fn all_pairs(free: &[usize]) -> Vec<(usize, usize)> {
    free.iter().copied().tuple_combinations().collect()
}

/// `count` random pairs of distinct free slots. Pairs may repeat.
pub fn sample_pairs(rng: &mut Rng, free: &[usize], count: usize) -> Vec<(usize, usize)> {
    (0..count).map(|_| random_pair(rng, free)).collect()
}

#[inline]
fn random_pair(rng: &mut Rng, free: &[usize]) -> (usize, usize) {
    let a = rng.usize(0..free.len());
    // Skip over `a` so the two picks are always distinct.
    let mut b = rng.usize(0..free.len() - 1);
    if b >= a {
        b += 1;
    }
    (free[a], free[b])
}

/// Applies `strength` random swaps among free slots.
pub fn perturb(layout: &mut SplitLayout, rng: &mut Rng, free: &[usize], strength: usize) {
    for _ in 0..strength {
        let (i, j) = random_pair(rng, free);
        layout.swap(i, j);
    }
}
