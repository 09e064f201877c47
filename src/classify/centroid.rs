use ndarray::{Array2, ArrayView2, Axis};

use super::{
    Classifier,
    classifier::{check_features, check_rows, classes_of},
};
use crate::{Result, SnnErr, data::Label};

/// Predicts the class whose mean feature row is closest.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroid {
    classes: Vec<Label>,
    centroids: Array2<f32>,
}

impl NearestCentroid {
    /// Creates a new, unfit `NearestCentroid`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, x: ArrayView2<f32>, y: &[Label]) -> Result<()> {
        check_rows(x, y)?;

        self.classes = classes_of(y);
        self.centroids = Array2::zeros((self.classes.len(), x.ncols()));
        let mut counts = vec![0usize; self.classes.len()];

        for (row, label) in x.rows().into_iter().zip(y) {
            let k = self
                .classes
                .binary_search(label)
                .map_err(|_| SnnErr::ClassifierNotFit)?;
            self.centroids.row_mut(k).scaled_add(1.0, &row);
            counts[k] += 1;
        }

        for (mut centroid, count) in self.centroids.axis_iter_mut(Axis(0)).zip(counts) {
            centroid /= count as f32;
        }

        Ok(())
    }

    fn predict(&self, x: ArrayView2<f32>) -> Result<Vec<Label>> {
        if self.classes.is_empty() {
            return Err(SnnErr::ClassifierNotFit);
        }
        check_features(x, self.centroids.ncols())?;

        let labels = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = (0, f32::INFINITY);
                for (k, centroid) in self.centroids.rows().into_iter().enumerate() {
                    let dist = (&centroid - &row).mapv(|v| v * v).sum();
                    if dist < best.1 {
                        best = (k, dist);
                    }
                }
                self.classes[best.0]
            })
            .collect();

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn picks_the_closest_mean() {
        let x = array![[0.0, 0.0], [0.2, 0.0], [5.0, 5.0], [5.0, 4.8]];
        let y = [1, 1, 3, 3];

        let mut clf = NearestCentroid::new();
        clf.fit(x.view(), &y).unwrap();

        assert_eq!(clf.score(x.view(), &y).unwrap(), 1.0);
        assert_eq!(
            clf.predict(array![[4.0, 4.0], [1.0, 0.5]].view()).unwrap(),
            vec![3, 1]
        );
    }

    #[test]
    fn empty_window_is_rejected() {
        let x = Array2::<f32>::zeros((0, 3));
        let err = NearestCentroid::new().fit(x.view(), &[]).unwrap_err();

        assert!(matches!(
            err,
            SnnErr::InvalidWindow {
                outputs: 0,
                labels: 0
            }
        ));
    }
}
