//! Split functions: dividing a length among a number of elements.

/// Divides `length` among `elements`.
///
/// The returned vector must have exactly `elements` entries, all
/// non-negative, summing to `length`.
pub type SplitFn = fn(usize, i32) -> Vec<i32>;

/// Split a length (almost) evenly among the elements.
///
/// Each step takes the remaining length divided by the remaining count,
/// rounded up, so any remainder goes to the earliest elements:
/// `even_split(3, 10) == [4, 3, 3]`.
pub fn even_split(elements: usize, length: i32) -> Vec<i32> {
    debug_assert!(length >= 0, "even_split: negative length {length}");
    let mut remaining = length.max(0);
    let mut left = i32::try_from(elements).unwrap_or(i32::MAX);
    let mut ret = Vec::with_capacity(elements);
    while left > 0 {
        // Rounded up without overflowing near i32::MAX.
        let v = remaining / left + i32::from(remaining % left != 0);
        remaining -= v;
        left -= 1;
        ret.push(v);
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split_front_loads_remainder() {
        assert_eq!(even_split(3, 10), vec![4, 3, 3]);
        assert_eq!(even_split(4, 10), vec![3, 3, 2, 2]);
        assert_eq!(even_split(2, 10), vec![5, 5]);
    }

    #[test]
    fn test_even_split_sums_exactly() {
        for k in 1..=17usize {
            for w in 0..=200 {
                let parts = even_split(k, w);
                assert_eq!(parts.len(), k);
                assert_eq!(parts.iter().sum::<i32>(), w);
                assert!(parts.iter().all(|&p| p >= 0));
                // Non-increasing, and never more than one apart.
                assert!(parts.windows(2).all(|p| p[0] >= p[1] && p[0] - p[1] <= 1));
            }
        }
        for k in [1usize, 2, 3, 7] {
            let parts = even_split(k, i32::MAX);
            assert_eq!(parts.iter().map(|&p| i64::from(p)).sum::<i64>(), i64::from(i32::MAX));
        }
        assert_eq!(even_split(2, i32::MAX), vec![i32::MAX / 2 + 1, i32::MAX / 2]);
    }

    #[test]
    fn test_even_split_more_elements_than_length() {
        assert_eq!(even_split(5, 2), vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_even_split_no_elements() {
        assert!(even_split(0, 10).is_empty());
    }
}
