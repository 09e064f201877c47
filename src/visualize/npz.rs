use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use log::info;
use ndarray::Array1;
use ndarray_npy::NpzWriter;

use super::{ClassOutput, VisualizationSink};
use crate::{Result, SnnErr, training::FeatureMapSnapshot};

const FEATURE_MAPS_FILE: &str = "feature_maps.npz";
const CLASS_OUTPUTS_FILE: &str = "class_outputs.npz";

/// Writes the run's diagnostics as `.npz` archives, to be plotted offline.
///
/// * `feature_maps.npz` holds `samples_seen` and one `s{snapshot}_m{map}` array per map.
/// * `class_outputs.npz` holds one `label_{label}` array per class.
#[derive(Debug, Clone)]
pub struct NpzSink {
    dir: PathBuf,
}

impl NpzSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn create(&self, name: &str) -> Result<(PathBuf, NpzWriter<File>)> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let file = File::create(&path)?;
        Ok((path, NpzWriter::new(file)))
    }
}

impl VisualizationSink for NpzSink {
    fn feature_maps(&mut self, snapshots: &[FeatureMapSnapshot], every: usize) -> Result<()> {
        let (path, mut npz) = self.create(FEATURE_MAPS_FILE)?;

        let seen: Array1<i64> = snapshots.iter().map(|s| s.samples_seen as i64).collect();
        npz.add_array("samples_seen", &seen)
            .map_err(|e| npz_err(&path, e))?;

        for (i, snapshot) in snapshots.iter().enumerate() {
            for (j, map) in snapshot.maps.iter().enumerate() {
                npz.add_array(format!("s{i}_m{j}"), map)
                    .map_err(|e| npz_err(&path, e))?;
            }
        }

        npz.finish().map_err(|e| npz_err(&path, e))?;
        info!(
            "wrote {} feature map snapshots, one every {every} samples, to {}",
            snapshots.len(),
            path.display()
        );

        Ok(())
    }

    fn class_outputs(&mut self, outputs: &[ClassOutput]) -> Result<()> {
        let (path, mut npz) = self.create(CLASS_OUTPUTS_FILE)?;

        for out in outputs {
            npz.add_array(format!("label_{}", out.label), &out.output)
                .map_err(|e| npz_err(&path, e))?;
        }

        npz.finish().map_err(|e| npz_err(&path, e))?;
        info!("wrote {} class outputs to {}", outputs.len(), path.display());

        Ok(())
    }
}

fn npz_err<E: std::fmt::Display>(path: &Path, e: E) -> SnnErr {
    SnnErr::Storage {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use ndarray::{Array2, array};
    use ndarray_npy::NpzReader;

    use super::*;

    #[test]
    fn writes_readable_archives() {
        let dir = env::temp_dir().join(format!("snn-trainer-{}-npz-sink", std::process::id()));
        let mut sink = NpzSink::new(&dir);

        let snapshots = vec![
            FeatureMapSnapshot {
                samples_seen: 4,
                maps: vec![array![[1.0, 2.0]], array![[3.0]]],
            },
            FeatureMapSnapshot {
                samples_seen: 8,
                maps: vec![array![[5.0, 6.0]], array![[7.0]]],
            },
        ];
        let outputs = vec![ClassOutput {
            label: 3,
            output: array![[0.5, 0.25], [0.0, 1.0]],
        }];

        sink.feature_maps(&snapshots, 4).unwrap();
        sink.class_outputs(&outputs).unwrap();

        let mut npz = NpzReader::new(File::open(dir.join(FEATURE_MAPS_FILE)).unwrap()).unwrap();
        let seen: Array1<i64> = npz.by_name("samples_seen").unwrap();
        let map: Array2<f32> = npz.by_name("s1_m0").unwrap();
        assert_eq!(seen, array![4i64, 8]);
        assert_eq!(map, array![[5.0f32, 6.0]]);

        let mut npz = NpzReader::new(File::open(dir.join(CLASS_OUTPUTS_FILE)).unwrap()).unwrap();
        let out: Array2<f32> = npz.by_name("label_3").unwrap();
        assert_eq!(out, outputs[0].output);

        fs::remove_dir_all(dir).ok();
    }
}
