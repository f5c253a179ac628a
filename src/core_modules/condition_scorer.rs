// THEORY:
// The scorer maps a `FeatureVector` to a probability distribution over the
// catalog. Each condition owns exactly two Gaussian-similarity kernels, each
// reading one feature:
//
//     g(x, center, scale) = -0.5 * ((x - center) / (scale + eps))^2
//
// A condition's log-score is the sum of its two kernels. A softmax with the
// maximum subtracted first turns log-scores into probabilities, so no input
// magnitude can overflow `exp`.
//
// The kernel table is fixed data, not learned parameters. Its rows are in
// catalog order.
//
// Key principles:
// 1.  **Total**: every `FeatureVector` yields a valid distribution. A NaN kernel
//     counts as an impossibly bad match; if nothing matches at all the result is
//     uniform.
// 2.  **Positional**: a `ScoreVector` is never reordered. Ranking builds a new
//     list and leaves the vector alone.
// 3.  **First Wins**: ties for the top spot go to the earlier catalog position.

use crate::core_modules::condition_catalog::CONDITION_COUNT;
use crate::core_modules::feature_extractor::{EPSILON, FeatureVector};
use crate::error::AnalysisError;
use serde::Serialize;

/// Allowed deviation of a probability sum from one.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// The feature a kernel reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureField {
    Luminance,
    Colorfulness,
    RedRatio,
    CenterVsEdge,
    /// `r_mean - g_mean`.
    RedGreenGap,
}

impl FeatureField {
    pub fn value(&self, features: &FeatureVector) -> f64 {
        match self {
            FeatureField::Luminance => features.luminance,
            FeatureField::Colorfulness => features.colorfulness,
            FeatureField::RedRatio => features.red_ratio,
            FeatureField::CenterVsEdge => features.center_vs_edge,
            FeatureField::RedGreenGap => features.r_mean - features.g_mean,
        }
    }
}

/// One Gaussian-similarity term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    pub field: FeatureField,
    pub center: f64,
    pub scale: f64,
}

impl Kernel {
    const fn new(field: FeatureField, center: f64, scale: f64) -> Self {
        Self {
            field,
            center,
            scale,
        }
    }

    /// Unnormalised log-similarity of `x` to this kernel's center.
    pub fn term(&self, x: f64) -> f64 {
        let z = (x - self.center) / (self.scale + EPSILON);
        -0.5 * z * z
    }

    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        self.term(self.field.value(features))
    }
}

/// The two kernels scoring one condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionKernel {
    pub first: Kernel,
    pub second: Kernel,
}

impl ConditionKernel {
    const fn new(first: Kernel, second: Kernel) -> Self {
        Self { first, second }
    }

    pub fn log_score(&self, features: &FeatureVector) -> f64 {
        self.first.evaluate(features) + self.second.evaluate(features)
    }
}

use FeatureField::*;

/// Kernel pairs in catalog order.
pub const KERNELS: [ConditionKernel; CONDITION_COUNT] = [
    // melanoma
    ConditionKernel::new(Kernel::new(RedRatio, 0.40, 0.15), Kernel::new(Colorfulness, 40.0, 30.0)),
    // melanocytic_nevus
    ConditionKernel::new(Kernel::new(RedRatio, 0.35, 0.20), Kernel::new(Luminance, 120.0, 60.0)),
    // basal_cell_carcinoma
    ConditionKernel::new(Kernel::new(RedRatio, 0.45, 0.20), Kernel::new(CenterVsEdge, 1.10, 0.20)),
    // actinic_keratosis
    ConditionKernel::new(Kernel::new(Luminance, 180.0, 50.0), Kernel::new(Colorfulness, 25.0, 20.0)),
    // benign_keratosis
    ConditionKernel::new(Kernel::new(Luminance, 140.0, 50.0), Kernel::new(RedRatio, 0.38, 0.15)),
    // dermatitis
    ConditionKernel::new(Kernel::new(RedRatio, 0.50, 0.20), Kernel::new(Colorfulness, 50.0, 25.0)),
    // vascular_lesion
    ConditionKernel::new(Kernel::new(RedRatio, 0.55, 0.20), Kernel::new(RedGreenGap, 20.0, 30.0)),
    // squamous_cell_carcinoma
    ConditionKernel::new(Kernel::new(Luminance, 160.0, 40.0), Kernel::new(CenterVsEdge, 0.95, 0.15)),
];

/// Probabilities over the catalog, positionally aligned with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreVector([f64; CONDITION_COUNT]);

impl ScoreVector {
    /// Wraps caller-built probabilities after checking every entry is in [0,1]
    /// and the sum is one within `SUM_TOLERANCE`.
    pub fn from_probabilities(probabilities: [f64; CONDITION_COUNT]) -> Result<Self, AnalysisError> {
        let sum: f64 = probabilities.iter().sum();
        let in_range = probabilities.iter().all(|p| (0.0..=1.0).contains(p));
        if !in_range || !((sum - 1.0).abs() <= SUM_TOLERANCE) {
            return Err(AnalysisError::UnnormalizedScores { sum });
        }
        Ok(Self(probabilities))
    }

    pub fn probabilities(&self) -> &[f64; CONDITION_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Index and probability of the first maximal entry.
    pub fn top(&self) -> (usize, f64) {
        let mut best = 0;
        for (index, &probability) in self.0.iter().enumerate().skip(1) {
            if probability > self.0[best] {
                best = index;
            }
        }
        (best, self.0[best])
    }

    /// `(index, probability)` pairs by descending probability, ties in catalog order.
    pub fn ranked(&self) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.0.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Pre-normalisation log-scores in catalog order.
pub fn log_scores(features: &FeatureVector) -> [f64; CONDITION_COUNT] {
    KERNELS.map(|kernel| kernel.log_score(features))
}

/// Scores `features` against every catalog entry.
pub fn score_conditions(features: &FeatureVector) -> ScoreVector {
    softmax(log_scores(features))
}

fn softmax(log_scores: [f64; CONDITION_COUNT]) -> ScoreVector {
    let log_scores = log_scores.map(|score| if score.is_nan() { f64::NEG_INFINITY } else { score });
    let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return ScoreVector([1.0 / CONDITION_COUNT as f64; CONDITION_COUNT]);
    }

    let exps = log_scores.map(|score| (score - max).exp());
    let total: f64 = exps.iter().sum();
    ScoreVector(exps.map(|e| e / total))
}

#[cfg(test)]
mod tests {
    use super::FeatureField::*;
    use super::*;
    use approx::assert_relative_eq;

    fn features(luminance: f64, colorfulness: f64, red_ratio: f64, center_vs_edge: f64, r: f64, g: f64) -> FeatureVector {
        FeatureVector {
            luminance,
            colorfulness,
            red_ratio,
            center_vs_edge,
            r_var: 0.0,
            g_var: 0.0,
            b_var: 0.0,
            r_mean: r,
            g_mean: g,
            b_mean: 0.0,
        }
    }

    fn assert_distribution(scores: &ScoreVector) {
        let sum: f64 = scores.probabilities().iter().sum();
        assert!((sum - 1.0).abs() <= SUM_TOLERANCE, "sum = {sum}");
        for p in scores.probabilities() {
            assert!((0.0..=1.0).contains(p), "p = {p}");
        }
    }

    #[test]
    fn kernel_peaks_at_its_center() {
        let kernel = Kernel::new(Luminance, 120.0, 60.0);
        assert_eq!(kernel.term(120.0), 0.0);
        assert_relative_eq!(kernel.term(180.0), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn distributions_hold_across_feature_space() {
        let values = [-1e300, -50.0, 0.0, 0.33, 1.0, 128.0, 255.0, 1e300, f64::INFINITY];
        for &a in &values {
            for &b in &values {
                let scores = score_conditions(&features(a, b.abs(), a, b, b, a));
                assert_distribution(&scores);
            }
        }
    }

    #[test]
    fn nan_features_still_give_a_distribution() {
        let scores = score_conditions(&features(f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN));
        assert_distribution(&scores);
        assert_relative_eq!(scores.probabilities()[3], 0.125);
    }

    #[test]
    fn moving_toward_a_center_raises_the_log_score() {
        let base = features(60.0, 90.0, 0.9, 1.6, 200.0, 20.0);
        for (index, kernel) in KERNELS.iter().enumerate() {
            for k in [kernel.first, kernel.second] {
                let far = base;
                let current = k.field.value(&far);
                let target = current + (k.center - current) / 2.0;
                let near = with_field(far, k.field, target);
                assert!(
                    KERNELS[index].log_score(&near) > KERNELS[index].log_score(&far),
                    "condition {index} field {:?}",
                    k.field
                );
            }
        }
    }

    fn with_field(mut f: FeatureVector, field: FeatureField, value: f64) -> FeatureVector {
        match field {
            Luminance => f.luminance = value,
            Colorfulness => f.colorfulness = value,
            RedRatio => f.red_ratio = value,
            CenterVsEdge => f.center_vs_edge = value,
            RedGreenGap => f.r_mean = f.g_mean + value,
        }
        f
    }

    #[test]
    fn first_maximal_index_wins_ties() {
        let tied = ScoreVector::from_probabilities([0.1, 0.3, 0.1, 0.3, 0.05, 0.05, 0.05, 0.05]).unwrap();
        assert_eq!(tied.top(), (1, 0.3));
        let ranked = tied.ranked();
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 3);
    }

    #[test]
    fn uniform_scores_pick_the_first_condition() {
        let uniform = ScoreVector::from_probabilities([0.125; CONDITION_COUNT]).unwrap();
        assert_eq!(uniform.top().0, 0);
    }

    #[test]
    fn ranking_leaves_the_vector_in_catalog_order() {
        let scores = ScoreVector::from_probabilities([0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.65]).unwrap();
        let before = *scores.probabilities();
        let ranked = scores.ranked();
        assert_eq!(ranked[0], (7, 0.65));
        assert_eq!(*scores.probabilities(), before);
    }

    #[test]
    fn unnormalized_vectors_are_rejected() {
        assert!(matches!(
            ScoreVector::from_probabilities([0.2; CONDITION_COUNT]),
            Err(AnalysisError::UnnormalizedScores { .. })
        ));
        assert!(ScoreVector::from_probabilities([1.5, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }
}
