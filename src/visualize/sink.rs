use ndarray::Array2;

use crate::{Result, data::Label, training::FeatureMapSnapshot};

/// The frozen model's output for one sample of a class.
#[derive(Debug, Clone)]
pub struct ClassOutput {
    pub label: Label,
    pub output: Array2<f32>,
}

/// Receives the diagnostics of a finished run. Nothing it does feeds back into training.
pub trait VisualizationSink {
    /// # Arguments
    /// * `snapshots` - The feature maps captured along the run, in order.
    /// * `every` - The amount of training samples between two snapshots.
    fn feature_maps(&mut self, snapshots: &[FeatureMapSnapshot], every: usize) -> Result<()>;

    /// # Arguments
    /// * `outputs` - One output per class, in the order the classes were first met.
    fn class_outputs(&mut self, outputs: &[ClassOutput]) -> Result<()>;
}
