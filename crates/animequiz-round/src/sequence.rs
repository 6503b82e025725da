//! Random reveal order.

use rand::Rng;

/// Draws a reveal sequence: a uniformly random permutation of `pool`,
/// truncated to its first `capacity` elements.
///
/// Fisher–Yates from the back: for `i` from the last index down to 1,
/// swap element `i` with a uniformly chosen index in `0..=i`. The result
/// has length `min(capacity, pool.len())` and never repeats an element.
pub fn draw_sequence<T, R>(pool: &[T], capacity: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut shuffled = pool.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled.truncate(capacity.min(pool.len()));
    shuffled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_draw_sequence_is_truncated_permutation() {
        let pool: Vec<u32> = (0..10).collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn = draw_sequence(&pool, 4, &mut rng);

            assert_eq!(drawn.len(), 4);
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), 4, "no repeats (seed {seed})");
            assert!(drawn.iter().all(|x| pool.contains(x)));
        }
    }

    #[test]
    fn test_draw_sequence_full_capacity_keeps_every_element() {
        let pool: Vec<u32> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let mut drawn = draw_sequence(&pool, 6, &mut rng);
        drawn.sort_unstable();

        assert_eq!(drawn, pool);
    }

    #[test]
    fn test_draw_sequence_capacity_above_pool_returns_pool_length() {
        let pool = vec!["a", "b"];
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(draw_sequence(&pool, 5, &mut rng).len(), 2);
    }

    #[test]
    fn test_draw_sequence_empty_pool_returns_empty() {
        let pool: Vec<u8> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(draw_sequence(&pool, 3, &mut rng).is_empty());
    }

    #[test]
    fn test_draw_sequence_every_element_can_lead() {
        // Over many seeds each element should show up first at least once.
        let pool = vec![0u8, 1, 2];
        let mut leaders = HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            leaders.insert(draw_sequence(&pool, 1, &mut rng)[0]);
        }
        assert_eq!(leaders.len(), 3);
    }
}
