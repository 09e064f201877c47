use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView1, ArrayView2, s};

use super::{
    Classifier,
    classifier::{check_features, check_rows, classes_of},
};
use crate::{Result, SnnErr, data::Label};

/// A multiclass linear perceptron with a bias term.
///
/// Keeps one weight row per class seen at fit time and, on every mistake,
/// moves the true class' row towards the sample and the predicted one away
/// from it. On linearly separable data it stops once an epoch goes by
/// without mistakes.
#[derive(Debug, Clone)]
pub struct Perceptron {
    max_epochs: NonZeroUsize,
    classes: Vec<Label>,
    // (classes, features + 1), the last column is the bias.
    weights: Array2<f32>,
}

impl Perceptron {
    /// Creates a new, unfit `Perceptron`.
    ///
    /// # Arguments
    /// * `max_epochs` - The maximum amount of sweeps over the data in `fit`.
    pub fn new(max_epochs: NonZeroUsize) -> Self {
        Self {
            max_epochs,
            classes: Vec::new(),
            weights: Array2::zeros((0, 0)),
        }
    }

    fn n_features(&self) -> usize {
        self.weights.ncols().saturating_sub(1)
    }

    /// Index of the best scoring class, the lowest one on ties.
    fn best_class(&self, row: ArrayView1<f32>) -> usize {
        let d = self.n_features();
        let scores = self.weights.slice(s![.., ..d]).dot(&row) + &self.weights.column(d);

        let mut best = 0;
        for (k, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = k;
            }
        }

        best
    }
}

impl Classifier for Perceptron {
    fn fit(&mut self, x: ArrayView2<f32>, y: &[Label]) -> Result<()> {
        check_rows(x, y)?;

        let d = x.ncols();
        self.classes = classes_of(y);
        self.weights = Array2::zeros((self.classes.len(), d + 1));

        for _ in 0..self.max_epochs.get() {
            let mut mistakes = 0;

            for (row, label) in x.rows().into_iter().zip(y) {
                let target = self
                    .classes
                    .binary_search(label)
                    .map_err(|_| SnnErr::ClassifierNotFit)?;
                let predicted = self.best_class(row);

                if predicted == target {
                    continue;
                }

                mistakes += 1;
                self.weights
                    .slice_mut(s![target, ..d])
                    .scaled_add(1.0, &row);
                self.weights[[target, d]] += 1.0;
                self.weights
                    .slice_mut(s![predicted, ..d])
                    .scaled_add(-1.0, &row);
                self.weights[[predicted, d]] -= 1.0;
            }

            if mistakes == 0 {
                break;
            }
        }

        Ok(())
    }

    fn predict(&self, x: ArrayView2<f32>) -> Result<Vec<Label>> {
        if self.classes.is_empty() {
            return Err(SnnErr::ClassifierNotFit);
        }
        check_features(x, self.n_features())?;

        let labels = x
            .rows()
            .into_iter()
            .map(|row| self.classes[self.best_class(row)])
            .collect();

        Ok(labels)
    }
}
