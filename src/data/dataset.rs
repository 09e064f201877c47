use std::path::Path;

use log::info;
use ndarray::{Array3, ArrayView2, ArrayView3, Axis};
use rand::{
    SeedableRng,
    rngs::StdRng,
    seq::{SliceRandom, index},
};

use super::SampleStore;
use crate::{Result, SnnErr};

/// The class of a sample.
pub type Label = u32;

/// A labeled collection of equally shaped 2D samples.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Array3<f32>,
    labels: Vec<Label>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `samples` - The samples stacked along the first axis, `(N, H, W)`.
    /// * `labels` - One label per sample.
    ///
    /// # Returns
    /// A `ShapeMismatch` error if the amount of samples and labels differ.
    pub fn new(samples: Array3<f32>, labels: Vec<Label>) -> Result<Self> {
        let n = samples.len_of(Axis(0));

        if n != labels.len() {
            return Err(SnnErr::ShapeMismatch {
                what: "data and labels",
                got: vec![labels.len()],
                expected: vec![n],
            });
        }

        Ok(Self { samples, labels })
    }

    /// Reads a dataset from storage.
    ///
    /// # Arguments
    /// * `store` - The reader for the stored samples and labels.
    /// * `data_path` - Where the samples are stored.
    /// * `label_path` - Where the labels are stored.
    pub fn load<S>(store: &S, data_path: &Path, label_path: &Path) -> Result<Self>
    where
        S: SampleStore + ?Sized,
    {
        let samples = store.load_samples(data_path)?;
        let labels = store.load_labels(label_path)?;
        let dataset = Self::new(samples, labels)?;

        let (h, w) = dataset.sample_shape();
        info!(
            "read {} datapoints from storage with shape {h}x{w}",
            dataset.len()
        );

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The shape shared by every sample.
    pub fn sample_shape(&self) -> (usize, usize) {
        let (_, h, w) = self.samples.dim();
        (h, w)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Splits the dataset into disjoint training and validation partitions.
    ///
    /// The order is shuffled with a generator seeded by `seed`, then
    /// `floor(len * validation_split)` positions are drawn without replacement
    /// for validation. The rest, in shuffled order, are the training partition.
    ///
    /// # Arguments
    /// * `validation_split` - Fraction of samples held out, in `[0, 1)`.
    /// * `seed` - The seed for the shuffle and the draw.
    ///
    /// # Returns
    /// The `(train, validation)` partitions.
    pub fn split(&self, validation_split: f64, seed: u64) -> Result<(Partition, Partition)> {
        if !(0.0..1.0).contains(&validation_split) {
            return Err(SnnErr::InvalidConfig(format!(
                "validation_split must be in [0, 1), got {validation_split}"
            )));
        }

        let n = self.len();
        let val_size = (n as f64 * validation_split).floor() as usize;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);

        let mut held_out = vec![false; n];
        let mut val_indices = Vec::with_capacity(val_size);
        for pos in index::sample(&mut rng, n, val_size) {
            held_out[pos] = true;
            val_indices.push(order[pos]);
        }

        let train_indices: Vec<usize> = order
            .iter()
            .zip(&held_out)
            .filter(|&(_, &held)| !held)
            .map(|(&i, _)| i)
            .collect();

        Ok((self.partition(train_indices), self.partition(val_indices)))
    }

    fn partition(&self, indices: Vec<usize>) -> Partition {
        Partition {
            samples: self.samples.select(Axis(0), &indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            indices,
        }
    }
}

/// A subset of a `Dataset`, owning copies of its samples.
#[derive(Debug, Clone)]
pub struct Partition {
    samples: Array3<f32>,
    labels: Vec<Label>,
    indices: Vec<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn sample(&self, i: usize) -> ArrayView2<'_, f32> {
        self.samples.index_axis(Axis(0), i)
    }

    pub fn samples(&self) -> ArrayView3<'_, f32> {
        self.samples.view()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The position of every sample in the dataset it was taken from.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ndarray::Array;

    use super::*;

    fn dataset(n: usize) -> Dataset {
        let samples = Array::from_shape_fn((n, 3, 4), |(k, _, _)| k as f32);
        let labels = (0..n as Label).map(|k| k % 3).collect();
        Dataset::new(samples, labels).unwrap()
    }

    #[test]
    fn count_mismatch_fails() {
        let samples = Array3::zeros((4, 3, 4));
        let err = Dataset::new(samples, vec![0, 1, 2]).unwrap_err();

        assert!(matches!(err, SnnErr::ShapeMismatch { .. }));
    }

    #[test]
    fn ten_samples_with_a_fifth_held_out() {
        let ds = dataset(10);
        let (train, val) = ds.split(0.2, 0).unwrap();

        assert_eq!(ds.sample_shape(), (3, 4));
        assert_eq!(val.len(), 2);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_the_dataset() {
        for n in [0, 1, 7, 10, 33] {
            for split in [0.0, 0.1, 0.25, 0.5, 0.9] {
                let ds = dataset(n);
                let (train, val) = ds.split(split, 42).unwrap();

                let expected_val = (n as f64 * split).floor() as usize;
                assert_eq!(val.len(), expected_val);
                assert_eq!(train.len(), n - expected_val);

                let train_set: HashSet<_> = train.indices().iter().copied().collect();
                let val_set: HashSet<_> = val.indices().iter().copied().collect();
                assert!(train_set.is_disjoint(&val_set));
                assert_eq!(train_set.len() + val_set.len(), n);
            }
        }
    }

    #[test]
    fn same_seed_same_partitions() {
        let ds = dataset(50);
        let (train_a, val_a) = ds.split(0.3, 7).unwrap();
        let (train_b, val_b) = ds.split(0.3, 7).unwrap();

        assert_eq!(train_a.indices(), train_b.indices());
        assert_eq!(val_a.indices(), val_b.indices());
    }

    #[test]
    fn samples_and_labels_stay_paired() {
        let ds = dataset(20);
        let (train, val) = ds.split(0.25, 3).unwrap();

        for part in [&train, &val] {
            for (row, &i) in part.indices().iter().enumerate() {
                assert_eq!(part.sample(row)[[0, 0]], i as f32);
                assert_eq!(part.labels()[row], ds.labels()[i]);
            }
        }
    }

    #[test]
    fn split_out_of_range_fails() {
        let ds = dataset(5);

        assert!(ds.split(1.0, 0).is_err());
        assert!(ds.split(-0.5, 0).is_err());
    }
}
