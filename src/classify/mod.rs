mod builder;
mod centroid;
mod classifier;
mod perceptron;

pub use builder::ClassifierBuilder;
pub use centroid::NearestCentroid;
pub use classifier::Classifier;
pub use perceptron::Perceptron;
