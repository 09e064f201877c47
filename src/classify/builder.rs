use super::{Classifier, NearestCentroid, Perceptron};
use crate::configs::ClassifierConfig;

/// Builds fresh `Classifier`s given a configuration.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierBuilder {
    config: ClassifierConfig,
}

impl ClassifierBuilder {
    /// Creates a new `ClassifierBuilder`.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Builds a new, unfit classifier.
    pub fn build(&self) -> Box<dyn Classifier> {
        match self.config {
            ClassifierConfig::Perceptron { max_epochs } => Box::new(Perceptron::new(max_epochs)),
            ClassifierConfig::NearestCentroid => Box::new(NearestCentroid::new()),
        }
    }
}
