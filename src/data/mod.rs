pub mod cursor;
pub mod dataset;
pub mod storage;

pub use cursor::SampleCursor;
pub use dataset::{Dataset, Label, Partition};
pub use storage::{NpyStore, SampleStore};
