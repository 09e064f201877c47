use ndarray::{Array2, ArrayView2};

use crate::Result;

/// The capabilities the trainer needs from a spiking network.
///
/// The trainer never looks at the network's layers, it only feeds samples,
/// toggles learning and asks for feature-map copies to visualize.
pub trait SpikingModel {
    /// The `(H, W)` shape of every input sample.
    fn input_shape(&self) -> (usize, usize);

    /// The `(H, W)` shape of every output of `forward`.
    fn output_shape(&self) -> (usize, usize);

    /// Runs a sample through the network, updating its weights when learning is enabled.
    ///
    /// # Arguments
    /// * `sample` - An input of shape `input_shape()`.
    ///
    /// # Returns
    /// The output potentials, of shape `output_shape()`.
    fn forward(&mut self, sample: ArrayView2<f32>) -> Result<Array2<f32>>;

    fn set_learning_enabled(&mut self, enabled: bool);

    fn is_learning_enabled(&self) -> bool;

    /// Copies of the weight slices worth visualizing. May be empty.
    fn feature_maps(&self) -> Vec<Array2<f32>> {
        Vec::new()
    }

    /// Disables learning, the network only runs inference.
    fn freeze(&mut self) {
        self.set_learning_enabled(false);
    }

    /// Enables learning again.
    fn unfreeze(&mut self) {
        self.set_learning_enabled(true);
    }
}

impl<M: SpikingModel + ?Sized> SpikingModel for Box<M> {
    fn input_shape(&self) -> (usize, usize) {
        (**self).input_shape()
    }

    fn output_shape(&self) -> (usize, usize) {
        (**self).output_shape()
    }

    fn forward(&mut self, sample: ArrayView2<f32>) -> Result<Array2<f32>> {
        (**self).forward(sample)
    }

    fn set_learning_enabled(&mut self, enabled: bool) {
        (**self).set_learning_enabled(enabled)
    }

    fn is_learning_enabled(&self) -> bool {
        (**self).is_learning_enabled()
    }

    fn feature_maps(&self) -> Vec<Array2<f32>> {
        (**self).feature_maps()
    }
}
