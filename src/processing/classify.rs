//! Reception classification.

use crate::types::Category;

/// Score difference beyond which a movie leaves the "Average" band.
pub const CATEGORY_THRESHOLD: f64 = 0.5;

/// Classify a movie from two scores.
///
/// `score_a - score_b` strictly above [`CATEGORY_THRESHOLD`] is [`Category::AboveAverage`],
/// strictly below its negation is [`Category::BelowAverage`], anything else (including the
/// exact boundaries and a NaN difference) is [`Category::Average`].
pub fn classify(score_a: f64, score_b: f64) -> Category {
    classify_difference(score_a - score_b)
}

/// Classify an already computed (and possibly rounded) `score_a - score_b`.
pub fn classify_difference(diff: f64) -> Category {
    if diff > CATEGORY_THRESHOLD {
        Category::AboveAverage
    } else if diff < -CATEGORY_THRESHOLD {
        Category::BelowAverage
    } else {
        Category::Average
    }
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::{classify, classify_difference, round_to};
    use crate::types::Category;

    #[test]
    fn equal_scores_are_average() {
        for x in [0.0, -3.5, 1.0e9, 7.25] {
            assert_eq!(classify(x, x), Category::Average);
        }
    }

    #[test]
    fn boundaries_are_average() {
        assert_eq!(classify(1.0, 0.5), Category::Average);
        assert_eq!(classify(0.5, 1.0), Category::Average);
    }

    #[test]
    fn just_past_boundaries() {
        assert_eq!(classify(1.51, 1.0), Category::AboveAverage);
        assert_eq!(classify(1.0, 1.51), Category::BelowAverage);
    }

    #[test]
    fn negative_scores_are_handled() {
        assert_eq!(classify(-1.0, -3.0), Category::AboveAverage);
        assert_eq!(classify(-3.0, -1.0), Category::BelowAverage);
    }

    #[test]
    fn non_finite_input_still_yields_a_label() {
        assert_eq!(classify(f64::NAN, 1.0), Category::Average);
        assert_eq!(classify(f64::INFINITY, 1.0), Category::AboveAverage);
        assert_eq!(classify(1.0, f64::INFINITY), Category::BelowAverage);
        assert!(Category::ALL.contains(&classify(f64::INFINITY, f64::INFINITY)));
    }

    #[test]
    fn label_matches_difference_sign_over_a_grid() {
        let steps: Vec<f64> = (-20..=20).map(|i| i as f64 * 0.25).collect();
        for &a in &steps {
            for &b in &steps {
                let expected = if a - b > 0.5 {
                    Category::AboveAverage
                } else if a - b < -0.5 {
                    Category::BelowAverage
                } else {
                    Category::Average
                };
                assert_eq!(classify(a, b), expected, "a={a} b={b}");
            }
        }
    }

    #[test]
    fn float_noise_at_the_boundary_survives_without_rounding() {
        // 8.3 - 7.8 is slightly above 0.5 in binary.
        assert_eq!(classify(8.3, 7.8), Category::AboveAverage);
        assert_eq!(classify_difference(round_to(8.3 - 7.8, 2)), Category::Average);
        assert_eq!(classify_difference(round_to(7.3 - 7.8, 2)), Category::Average);
    }

    #[test]
    fn rounding_keeps_requested_decimals() {
        assert_eq!(round_to(7.333_333, 2), 7.33);
        assert_eq!(round_to(-0.456, 1), -0.5);
        assert_eq!(round_to(2.0, 0), 2.0);
    }
}
