use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the dataset lives and how its samples are laid out on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// A `.npy` file holding an `(N, A, B)` array of `f32` samples.
    pub data_path: PathBuf,
    /// A `.npy` file holding `N` integer labels.
    pub label_path: PathBuf,
    /// Whether each stored sample has to be transposed into `(B, A)` on load.
    #[serde(default)]
    pub transpose: bool,
}
