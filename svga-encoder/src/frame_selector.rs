//! Picking an evenly spaced subset of frames

/// Chooses `min(n, max)` indices out of `0..n`.
///
/// When thinning is needed the first `max - 1` indices are spaced as
/// `floor(i * (n - 1) / (max - 1))` and the last one is always `n - 1`.
/// Because `n > max`, the spacing step exceeds one, so the result is strictly
/// increasing and never repeats the final index.
pub fn select_indices(n: usize, max: usize) -> Vec<usize> {
    if n <= max {
        return (0..n).collect();
    }
    if max == 0 {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..max - 1).map(|i| i * (n - 1) / (max - 1)).collect();
    indices.push(n - 1);
    indices
}

/// Returns the frames at [`select_indices`] positions, in order
pub fn select_frames<T>(frames: &[T], max: usize) -> Vec<&T> {
    select_indices(frames.len(), max)
        .into_iter()
        .map(|i| &frames[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_thinning_when_under_budget() {
        assert_eq!(select_indices(4, 10), vec![0, 1, 2, 3]);
        assert_eq!(select_indices(10, 10), (0..10).collect::<Vec<_>>());
        assert!(select_indices(0, 3).is_empty());
    }

    #[test]
    fn test_twenty_into_ten() {
        assert_eq!(select_indices(20, 10), vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 19]);
    }

    #[test]
    fn test_small_budgets() {
        assert_eq!(select_indices(5, 1), vec![4]);
        assert_eq!(select_indices(5, 2), vec![0, 4]);
        assert_eq!(select_indices(3, 2), vec![0, 2]);
        assert!(select_indices(5, 0).is_empty());
    }

    #[test]
    fn test_invariants_over_grid() {
        for n in 0..60 {
            for max in 1..25 {
                let indices = select_indices(n, max);
                assert_eq!(indices.len(), n.min(max), "n={n} max={max}");
                assert!(
                    indices.windows(2).all(|w| w[0] < w[1]),
                    "not strictly increasing: n={n} max={max} {indices:?}"
                );
                assert!(indices.iter().all(|&i| i < n));
                if n > 0 {
                    assert_eq!(indices.last(), Some(&(n - 1)), "n={n} max={max}");
                }
                if n > 0 && max > 1 {
                    assert_eq!(indices.first(), Some(&0));
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(select_indices(97, 13), select_indices(97, 13));
    }

    #[test]
    fn test_select_frames_preserves_order() {
        let frames: Vec<String> = (0..7).map(|i| format!("f{i}")).collect();
        let picked = select_frames(&frames, 3);
        assert_eq!(picked, vec!["f0", "f3", "f6"]);
    }
}
