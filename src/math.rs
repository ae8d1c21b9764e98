//! Rounding helpers shared by the colony formulas.

/// Rounds halves up after truncating toward zero.
///
/// The integer part is taken with truncation, so negative inputs round toward
/// zero at the half: `-0.5 -> 0`, `-1.5 -> -1`, `-1.6 -> -1`. Every economy
/// formula depends on this exact boundary behaviour.
pub fn round_half_up(x: f64) -> i64 {
    let whole = x.trunc();
    if x < whole + 0.5 {
        whole as i64
    } else {
        whole as i64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4999), 2);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(7.0), 7);
    }

    #[test]
    fn negative_inputs_use_truncation() {
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.2), 0);
        assert_eq!(round_half_up(-1.6), -1);
        assert_eq!(round_half_up(-2.0), -2);
    }

    proptest! {
        #[test]
        fn non_negative_matches_std_round(x in 0.0f64..1.0e6) {
            prop_assert_eq!(round_half_up(x), x.round() as i64);
        }
    }
}
