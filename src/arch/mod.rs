mod model;

pub use model::SpikingModel;
