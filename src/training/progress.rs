use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

const BAR_TEMPLATE: &str = "{prefix:>10} [{elapsed_precise}] [{wide_bar}] {pos:>6}/{len:6} {msg}";

/// A metric value, possibly not available yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    /// Nothing was measured yet, e.g. before the first evaluation window closes.
    #[default]
    Pending,
    Value(f32),
}

impl Metric {
    pub fn value(self) -> Option<f32> {
        match self {
            Metric::Pending => None,
            Metric::Value(v) => Some(v),
        }
    }
}

impl From<Option<f32>> for Metric {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Metric::Pending, Metric::Value)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Pending => write!(f, "NaN"),
            Metric::Value(v) => write!(f, "{v:.4}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MetricStats {
    last: Metric,
    sum: f64,
    count: usize,
}

impl MetricStats {
    fn record(&mut self, metric: Metric) {
        self.last = metric;
        if let Metric::Value(v) = metric {
            self.sum += v as f64;
            self.count += 1;
        }
    }
}

/// Accumulates per-step metrics over an epoch and renders them on a progress bar.
pub struct ProgressNotifier {
    title: &'static str,
    total: usize,
    position: usize,
    metrics: BTreeMap<&'static str, MetricStats>,
    bar: ProgressBar,
}

impl ProgressNotifier {
    /// Creates a new `ProgressNotifier`.
    ///
    /// # Arguments
    /// * `title` - Shown in front of the bar and in the logs.
    /// * `total` - The amount of steps in one epoch.
    /// * `show_bar` - Whether to draw the bar at all.
    pub fn new(title: &'static str, total: usize, show_bar: bool) -> Self {
        let bar = if show_bar {
            let style = ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            ProgressBar::new(total as u64).with_style(style)
        } else {
            ProgressBar::hidden()
        };
        bar.set_prefix(title);

        Self {
            title,
            total,
            position: 0,
            metrics: BTreeMap::new(),
            bar,
        }
    }

    /// Records `metrics` and advances one step.
    pub fn update<I>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = (&'static str, Metric)>,
    {
        self.record(metrics);
        self.position = (self.position + 1).min(self.total);
        self.bar.set_position(self.position as u64);
        self.bar.set_message(self.summary());
    }

    /// Records `metrics` without advancing and closes the bar for this epoch.
    pub fn finish<I>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = (&'static str, Metric)>,
    {
        self.record(metrics);
        let summary = self.summary();
        self.bar.finish_with_message(summary.clone());
        info!("{}: {summary}", self.title);
    }

    /// Clears every metric and rewinds the bar to the start of an epoch.
    pub fn reset(&mut self) {
        self.metrics.clear();
        self.position = 0;
        self.bar.reset();
    }

    /// The last value recorded for `key`.
    pub fn last(&self, key: &str) -> Option<Metric> {
        self.metrics.get(key).map(|stats| stats.last)
    }

    /// The mean of every value recorded for `key`, `None` if none were.
    pub fn mean(&self, key: &str) -> Option<f32> {
        let stats = self.metrics.get(key)?;
        if stats.count == 0 {
            return None;
        }

        Some((stats.sum / stats.count as f64) as f32)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn record<I>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = (&'static str, Metric)>,
    {
        for (key, metric) in metrics {
            self.metrics.entry(key).or_default().record(metric);
        }
    }

    fn summary(&self) -> String {
        self.metrics
            .iter()
            .map(|(key, stats)| format!("{key}: {}", stats.last))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_values_are_tolerated() {
        let mut prog = ProgressNotifier::new("Training", 3, false);
        prog.update([("Accuracy", Metric::Pending)]);

        assert_eq!(prog.last("Accuracy"), Some(Metric::Pending));
        assert_eq!(prog.mean("Accuracy"), None);
        assert_eq!(Metric::Pending.to_string(), "NaN");
    }

    #[test]
    fn mean_skips_pending_values() {
        let mut prog = ProgressNotifier::new("Training", 4, false);
        prog.update([("Accuracy", Metric::Pending)]);
        prog.update([("Accuracy", Metric::Value(0.5))]);
        prog.update([("Accuracy", Metric::Value(1.0))]);

        assert_eq!(prog.mean("Accuracy"), Some(0.75));
        assert_eq!(prog.last("Accuracy"), Some(Metric::Value(1.0)));
    }

    #[test]
    fn position_is_capped_and_finish_does_not_advance() {
        let mut prog = ProgressNotifier::new("Validating", 2, false);
        let nothing: [(&'static str, Metric); 0] = [];
        for _ in 0..5 {
            prog.update(nothing);
        }
        prog.finish([("Mean Accuracy", Metric::Value(0.9))]);

        assert_eq!(prog.position(), 2);
        assert_eq!(prog.last("Mean Accuracy"), Some(Metric::Value(0.9)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut prog = ProgressNotifier::new("Training", 2, false);
        prog.update([("Accuracy", Metric::Value(0.3))]);
        prog.reset();

        assert_eq!(prog.position(), 0);
        assert_eq!(prog.last("Accuracy"), None);
        assert_eq!(prog.mean("Accuracy"), None);
    }
}
