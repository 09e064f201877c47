use ndarray::ArrayView3;

use crate::{Result, SnnErr, classify::ClassifierBuilder, configs::ClassifierConfig, data::Label};

/// Measures how separable a window of model outputs is.
///
/// Every call fits a brand new classifier on the flattened window and scores it
/// on that same window, so the accuracy reflects the representation and not
/// how well the classifier generalizes.
#[derive(Debug, Clone, Copy)]
pub struct WindowedEvaluator {
    builder: ClassifierBuilder,
}

impl WindowedEvaluator {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            builder: ClassifierBuilder::new(config),
        }
    }

    /// Fits and scores a fresh classifier on one window.
    ///
    /// # Arguments
    /// * `outputs` - The model outputs of the window, `(window, out_h, out_w)`.
    /// * `labels` - The label of each output.
    ///
    /// # Returns
    /// The in-sample accuracy, in `[0, 1]`.
    ///
    /// # Errors
    /// `InvalidWindow` if the window is empty or the lengths disagree.
    pub fn evaluate(&self, outputs: ArrayView3<f32>, labels: &[Label]) -> Result<f32> {
        let (window, out_h, out_w) = outputs.dim();

        if window == 0 || window != labels.len() {
            return Err(SnnErr::InvalidWindow {
                outputs: window,
                labels: labels.len(),
            });
        }

        let flat = outputs
            .to_shape((window, out_h * out_w))
            .map_err(|_| SnnErr::ShapeMismatch {
                what: "evaluation window",
                got: vec![window, out_h, out_w],
                expected: vec![window, out_h * out_w],
            })?;

        let mut classifier = self.builder.build();
        classifier.fit(flat.view(), labels)?;
        classifier.score(flat.view(), labels)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ndarray::{Array, Array3};

    use super::*;

    fn evaluators() -> [WindowedEvaluator; 2] {
        [
            WindowedEvaluator::new(ClassifierConfig::Perceptron {
                max_epochs: NonZeroUsize::new(100).unwrap(),
            }),
            WindowedEvaluator::new(ClassifierConfig::NearestCentroid),
        ]
    }

    #[test]
    fn separable_window_scores_one() {
        // Class `c` fires on row `c` of the output map.
        let labels: Vec<Label> = (0..100).map(|i| (i % 4) as Label).collect();
        let outputs = Array::from_shape_fn((100, 4, 5), |(i, r, _)| {
            if r == i % 4 { 1.0 } else { 0.0 }
        });

        for evaluator in evaluators() {
            assert_eq!(evaluator.evaluate(outputs.view(), &labels).unwrap(), 1.0);
        }
    }

    #[test]
    fn accuracy_is_within_bounds() {
        let labels: Vec<Label> = (0..20).map(|i| (i * 7 % 3) as Label).collect();
        let outputs = Array::from_shape_fn((20, 2, 3), |(i, r, c)| ((i * 31 + r * 7 + c) % 5) as f32);

        for evaluator in evaluators() {
            let acc = evaluator.evaluate(outputs.view(), &labels).unwrap();
            assert!((0.0..=1.0).contains(&acc));
        }
    }

    #[test]
    fn evaluations_do_not_share_state() {
        let [evaluator, _] = evaluators();
        let outputs = Array::from_shape_fn((10, 1, 2), |(i, _, c)| (i % 2 == c) as u8 as f32);
        let labels: Vec<Label> = (0..10).map(|i| (i % 2) as Label).collect();
        let flipped: Vec<Label> = labels.iter().map(|l| 1 - l).collect();

        assert_eq!(evaluator.evaluate(outputs.view(), &labels).unwrap(), 1.0);
        assert_eq!(evaluator.evaluate(outputs.view(), &flipped).unwrap(), 1.0);
    }

    #[test]
    fn empty_window_fails() {
        let [evaluator, _] = evaluators();
        let outputs = Array3::<f32>::zeros((0, 2, 2));

        assert!(matches!(
            evaluator.evaluate(outputs.view(), &[]),
            Err(SnnErr::InvalidWindow { .. })
        ));
    }

    #[test]
    fn label_count_must_match_the_window() {
        let [evaluator, _] = evaluators();
        let outputs = Array3::<f32>::zeros((3, 2, 2));

        let err = evaluator.evaluate(outputs.view(), &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            SnnErr::InvalidWindow {
                outputs: 3,
                labels: 2
            }
        ));
    }
}
