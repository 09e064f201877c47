use std::path::Path;

use ndarray::{Array1, Array3};
use ndarray_npy::{ReadNpyError, read_npy};

use super::Label;
use crate::{Result, SnnErr};

/// Reads raw samples and labels from storage.
pub trait SampleStore {
    /// Loads every sample as one `(N, H, W)` array.
    fn load_samples(&self, path: &Path) -> Result<Array3<f32>>;

    /// Loads the `N` labels, in the same order as the samples.
    fn load_labels(&self, path: &Path) -> Result<Vec<Label>>;
}

/// A `SampleStore` backed by `.npy` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpyStore {
    transpose: bool,
}

impl NpyStore {
    /// Creates a new `NpyStore`.
    ///
    /// # Arguments
    /// * `transpose` - Whether each stored `(A, B)` sample has to be turned into `(B, A)`.
    pub fn new(transpose: bool) -> Self {
        Self { transpose }
    }
}

impl SampleStore for NpyStore {
    fn load_samples(&self, path: &Path) -> Result<Array3<f32>> {
        let samples: Array3<f32> = read_npy(path).map_err(|e| storage_err(path, e))?;

        if !self.transpose {
            return Ok(samples);
        }

        Ok(samples
            .permuted_axes([0, 2, 1])
            .as_standard_layout()
            .into_owned())
    }

    /// Integer labels are read as they are. Float labels, as exported from
    /// `.mat` files, are accepted as long as they are whole numbers.
    fn load_labels(&self, path: &Path) -> Result<Vec<Label>> {
        let raw: Array1<i64> = match read_npy(path) {
            Ok(raw) => raw,
            Err(ReadNpyError::WrongDescriptor(_)) => read_float_labels(path)?,
            Err(e) => return Err(storage_err(path, e)),
        };

        raw.iter()
            .map(|&label| {
                Label::try_from(label).map_err(|_| SnnErr::Storage {
                    path: path.to_path_buf(),
                    msg: format!("label {label} is not a valid class"),
                })
            })
            .collect()
    }
}

fn read_float_labels(path: &Path) -> Result<Array1<i64>> {
    let raw: Array1<f64> = read_npy(path).map_err(|e| storage_err(path, e))?;

    raw.iter()
        .map(|&label| {
            if label.is_finite() && label.fract() == 0.0 {
                Ok(label as i64)
            } else {
                Err(SnnErr::Storage {
                    path: path.to_path_buf(),
                    msg: format!("label {label} is not a whole number"),
                })
            }
        })
        .collect()
}

fn storage_err<E: std::fmt::Display>(path: &Path, e: E) -> SnnErr {
    SnnErr::Storage {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}
