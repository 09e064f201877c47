use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use super::{DatasetConfig, TrainerConfig};
use crate::{Result, arch::SpikingModel, training::Trainer, visualize::NpzSink};

/// Everything needed for a full run, as read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub trainer: TrainerConfig,
    pub epochs: NonZeroUsize,
    /// Directory the visualization artifacts are written to, if any.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Loads a `RunConfig` from a JSON file.
    ///
    /// # Errors
    /// Fails if the file can't be read, isn't valid JSON or holds invalid values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parses and validates a `RunConfig` from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.trainer.validate()?;
        Ok(config)
    }

    /// Reads the dataset and builds the `Trainer` for this run.
    ///
    /// When `output_dir` is set, an `NpzSink` writing to it is attached.
    ///
    /// # Errors
    /// Fails if the dataset can't be read or the trainer config is invalid.
    pub fn trainer<M: SpikingModel>(&self) -> Result<Trainer<M>> {
        let mut trainer = Trainer::load(&self.dataset, self.trainer.clone())?;

        if let Some(dir) = &self.output_dir {
            info!("visualizations will be written to {}", dir.display());
            trainer.set_sink(Box::new(NpzSink::new(dir.clone())));
        }

        Ok(trainer)
    }
}
