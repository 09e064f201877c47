mod evaluator;
mod progress;
mod report;
mod trainer;

pub use evaluator::WindowedEvaluator;
pub use progress::{Metric, ProgressNotifier};
pub use report::{EpochStats, FeatureMapSnapshot, FitReport};
pub use trainer::Trainer;
