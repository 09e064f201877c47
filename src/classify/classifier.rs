use ndarray::ArrayView2;

use crate::{Result, SnnErr, data::Label};

/// A small supervised classifier over flattened feature rows.
pub trait Classifier {
    /// Fits the classifier, discarding anything learnt before.
    ///
    /// # Arguments
    /// * `x` - One feature row per sample.
    /// * `y` - The label of each row.
    fn fit(&mut self, x: ArrayView2<f32>, y: &[Label]) -> Result<()>;

    /// Predicts a label for every row of `x`.
    fn predict(&self, x: ArrayView2<f32>) -> Result<Vec<Label>>;

    /// The fraction of rows of `x` whose predicted label matches `y`.
    fn score(&self, x: ArrayView2<f32>, y: &[Label]) -> Result<f32> {
        check_rows(x, y)?;

        let correct = self
            .predict(x)?
            .iter()
            .zip(y)
            .filter(|(pred, label)| pred == label)
            .count();

        Ok(correct as f32 / y.len() as f32)
    }
}

/// Fails unless there's at least one row and exactly one label per row.
pub(super) fn check_rows(x: ArrayView2<f32>, y: &[Label]) -> Result<()> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return Err(SnnErr::InvalidWindow {
            outputs: x.nrows(),
            labels: y.len(),
        });
    }

    Ok(())
}

/// Sorted distinct labels.
pub(super) fn classes_of(y: &[Label]) -> Vec<Label> {
    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Fails if `x` doesn't have `expected` columns.
pub(super) fn check_features(x: ArrayView2<f32>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(SnnErr::ShapeMismatch {
            what: "classifier features",
            got: vec![x.ncols()],
            expected: vec![expected],
        });
    }

    Ok(())
}
