use ndarray::ArrayView2;

use super::{Label, Partition};
use crate::{Result, SnnErr};

/// Ordered, resettable iteration over the samples of one partition.
#[derive(Debug, Clone)]
pub struct SampleCursor {
    name: &'static str,
    partition: Partition,
    index: usize,
}

impl SampleCursor {
    /// Creates a new `SampleCursor` positioned at the first sample.
    ///
    /// # Arguments
    /// * `name` - The partition's name, used in error messages.
    /// * `partition` - The samples to iterate over.
    pub fn new(name: &'static str, partition: Partition) -> Self {
        Self {
            name,
            partition,
            index: 0,
        }
    }

    /// Returns the sample at the current index and advances the index by one.
    ///
    /// # Errors
    /// `ExhaustedCursor` once every sample was read, until `reset` is called.
    pub fn next(&mut self) -> Result<ArrayView2<'_, f32>> {
        if self.index >= self.partition.len() {
            return Err(SnnErr::ExhaustedCursor {
                partition: self.name,
                size: self.partition.len(),
            });
        }

        let sample = self.partition.sample(self.index);
        self.index += 1;
        Ok(sample)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.index = 0;
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partition.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[Label] {
        self.partition.labels()
    }

    #[inline]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }
}
