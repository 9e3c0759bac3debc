//! Utilities.

/// Returns the index of the largest value, the first one on ties.
///
/// Returns `0` for an empty input.
pub fn argmax<'a>(values: impl IntoIterator<Item = &'a f32>) -> usize {
    values
        .into_iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(im, m), (i, &x)| {
            if x > m {
                (i, x)
            } else {
                (im, m)
            }
        })
        .0
}

#[cfg(test)]
mod test {
    use super::argmax;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, -1.0]), 1);
        assert_eq!(argmax(&[-3.0]), 0);
        assert_eq!(argmax(&[]), 0);
    }
}
