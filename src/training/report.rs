use std::time::Duration;

use ndarray::{Array2, Array4};

/// Copies of the model's feature maps at some point of the run.
#[derive(Debug, Clone)]
pub struct FeatureMapSnapshot {
    /// Training samples seen, counted across epochs, when the copy was taken.
    pub samples_seen: usize,
    pub maps: Vec<Array2<f32>>,
}

/// What happened during one epoch.
#[derive(Debug, Clone)]
pub struct EpochStats {
    pub epoch: usize,
    /// Accuracy of every training window, in order.
    pub train_scores: Vec<f32>,
    /// Accuracy of every validation window, in order.
    pub val_scores: Vec<f32>,
    pub elapsed: Duration,
}

impl EpochStats {
    /// Mean training window accuracy, `None` if no window completed.
    pub fn train_accuracy(&self) -> Option<f32> {
        mean(&self.train_scores)
    }

    /// Mean validation window accuracy, `None` if no window completed.
    pub fn val_accuracy(&self) -> Option<f32> {
        mean(&self.val_scores)
    }
}

/// Everything a `fit` call produces.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Training outputs, `(epochs, train_size, out_h, out_w)`.
    pub train_potentials: Array4<f32>,
    /// Validation outputs, `(epochs, val_size, out_h, out_w)`.
    pub val_potentials: Array4<f32>,
    pub epochs: Vec<EpochStats>,
    pub feature_maps: Vec<FeatureMapSnapshot>,
}

pub(crate) fn mean(scores: &[f32]) -> Option<f32> {
    if scores.is_empty() {
        return None;
    }

    Some(scores.iter().sum::<f32>() / scores.len() as f32)
}

/// Formats a duration as `MM:SS:cc`.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 60.0) as u64,
        (secs % 60.0) as u64,
        (secs % 1.0 * 100.0) as u64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[0.5, 1.0]), Some(0.75));
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(Duration::from_millis(125_500)), "02:05:50");
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
    }
}
