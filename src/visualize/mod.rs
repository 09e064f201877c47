mod npz;
mod sink;

pub use npz::NpzSink;
pub use sink::{ClassOutput, VisualizationSink};
