//! Sample-by-sample training and evaluation of spiking neural networks on
//! pre-extracted audio feature maps.

pub mod arch;
pub mod classify;
pub mod configs;
pub mod data;
pub mod error;
pub mod training;
pub mod visualize;

pub use error::{Result, SnnErr};
