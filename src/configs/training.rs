use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{Result, SnnErr};

const DEFAULT_VALIDATION_SPLIT: f64 = 0.2;
const DEFAULT_TEST_FREQ: NonZeroUsize = NonZeroUsize::new(100).unwrap();
const DEFAULT_VISUALIZE_FREQ: NonZeroUsize = NonZeroUsize::new(2000).unwrap();
const DEFAULT_PERCEPTRON_EPOCHS: NonZeroUsize = NonZeroUsize::new(50).unwrap();

/// The auxiliary classifier fit on every evaluation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClassifierConfig {
    Perceptron { max_epochs: NonZeroUsize },
    NearestCentroid,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::Perceptron {
            max_epochs: DEFAULT_PERCEPTRON_EPOCHS,
        }
    }
}

/// Training loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Fraction of the dataset held out for validation, in `[0, 1)`.
    pub validation_split: f64,
    /// Seed for the shuffle and the validation draw.
    pub seed: u64,
    /// Size of the contiguous windows the auxiliary classifier is fit on.
    pub test_freq: NonZeroUsize,
    /// Every how many training samples, counted across epochs, the feature maps are captured.
    pub visualize_freq: NonZeroUsize,
    pub classifier: ClassifierConfig,
    pub show_progress: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            validation_split: DEFAULT_VALIDATION_SPLIT,
            seed: 0,
            test_freq: DEFAULT_TEST_FREQ,
            visualize_freq: DEFAULT_VISUALIZE_FREQ,
            classifier: ClassifierConfig::default(),
            show_progress: true,
        }
    }
}

impl TrainerConfig {
    /// Checks the values that serde can't.
    ///
    /// # Returns
    /// An `InvalidConfig` error if the validation split is outside of `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        let split = self.validation_split;
        if !(0.0..1.0).contains(&split) {
            return Err(SnnErr::InvalidConfig(format!(
                "validation_split must be in [0, 1), got {split}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: TrainerConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.validation_split, 0.2);
        assert_eq!(config.test_freq.get(), 100);
        assert_eq!(config.visualize_freq.get(), 2000);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert!(config.show_progress);
    }

    #[test]
    fn classifier_is_tagged_by_kind() {
        let json = r#"{ "classifier": { "kind": "nearest_centroid" }, "test_freq": 10 }"#;
        let config: TrainerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.classifier, ClassifierConfig::NearestCentroid);
        assert_eq!(config.test_freq.get(), 10);
    }

    #[test]
    fn zero_test_freq_is_rejected() {
        assert!(serde_json::from_str::<TrainerConfig>(r#"{ "test_freq": 0 }"#).is_err());
    }

    #[test]
    fn validation_split_bounds() {
        let mut config = TrainerConfig::default();

        for split in [0.0, 0.5, 0.99] {
            config.validation_split = split;
            assert!(config.validate().is_ok());
        }

        for split in [1.0, -0.1, f64::NAN] {
            config.validation_split = split;
            assert!(config.validate().is_err());
        }
    }
}
