mod dataset;
mod run;
mod training;

pub use dataset::DatasetConfig;
pub use run::RunConfig;
pub use training::{ClassifierConfig, TrainerConfig};
