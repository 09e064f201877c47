use std::{collections::BTreeSet, time::Instant};

use log::{debug, info, warn};
use ndarray::{Array4, ArrayView2, ArrayViewMut3, Axis, s};

use super::{
    EpochStats, FeatureMapSnapshot, FitReport, Metric, ProgressNotifier, WindowedEvaluator,
    report::{format_elapsed, mean},
};
use crate::{
    Result, SnnErr,
    arch::SpikingModel,
    configs::{DatasetConfig, TrainerConfig},
    data::{Dataset, NpyStore, Partition, SampleCursor, SampleStore},
    visualize::{ClassOutput, VisualizationSink},
};

const ACCURACY: &str = "Accuracy";
const MEAN_ACCURACY: &str = "Mean Accuracy";

/// Trains a spiking model on a partitioned dataset, one sample at a time.
///
/// Each epoch runs the whole training partition with learning enabled and then
/// the validation partition with the model frozen. Every `test_freq` samples a
/// fresh auxiliary classifier is fit on the window of outputs just recorded,
/// which measures how separable the model's representation is.
pub struct Trainer<M: SpikingModel> {
    config: TrainerConfig,
    data_shape: (usize, usize),
    train: SampleCursor,
    val: SampleCursor,
    train_prog: ProgressNotifier,
    val_prog: ProgressNotifier,
    evaluator: WindowedEvaluator,
    model: Option<M>,
    sink: Option<Box<dyn VisualizationSink>>,
}

impl<M: SpikingModel> Trainer<M> {
    /// Creates a new `Trainer`, partitioning `dataset` as the config says.
    ///
    /// # Arguments
    /// * `dataset` - The labeled samples.
    /// * `config` - The training loop parameters.
    ///
    /// # Returns
    /// An `InvalidConfig` error if the validation split is out of range.
    pub fn new(dataset: &Dataset, config: TrainerConfig) -> Result<Self> {
        config.validate()?;

        let (train, val) = dataset.split(config.validation_split, config.seed)?;
        info!(
            "partitioned {} datapoints into {} for training and {} for validation",
            dataset.len(),
            train.len(),
            val.len()
        );

        Ok(Self {
            data_shape: dataset.sample_shape(),
            train_prog: ProgressNotifier::new("Training", train.len(), config.show_progress),
            val_prog: ProgressNotifier::new("Validating", val.len(), false),
            train: SampleCursor::new("training", train),
            val: SampleCursor::new("validation", val),
            evaluator: WindowedEvaluator::new(config.classifier),
            model: None,
            sink: None,
            config,
        })
    }

    /// Reads the dataset from `.npy` files and creates a `Trainer` for it.
    pub fn load(dataset: &DatasetConfig, config: TrainerConfig) -> Result<Self> {
        let store = NpyStore::new(dataset.transpose);
        Self::load_from(&store, dataset, config)
    }

    /// Reads the dataset through `store` and creates a `Trainer` for it.
    pub fn load_from<S>(store: &S, dataset: &DatasetConfig, config: TrainerConfig) -> Result<Self>
    where
        S: SampleStore + ?Sized,
    {
        let dataset = Dataset::load(store, &dataset.data_path, &dataset.label_path)?;
        Self::new(&dataset, config)
    }

    /// Attaches the model to fit. Has to be done before calling `fit`.
    ///
    /// # Errors
    /// `ShapeMismatch` if the model expects inputs of another shape than the data's.
    pub fn set_model(&mut self, model: M) -> Result<()> {
        let input_shape = model.input_shape();

        if input_shape != self.data_shape {
            return Err(SnnErr::ShapeMismatch {
                what: "model input and data",
                got: vec![input_shape.0, input_shape.1],
                expected: vec![self.data_shape.0, self.data_shape.1],
            });
        }

        self.model = Some(model);
        Ok(())
    }

    /// Attaches a sink that receives the feature maps and per-class outputs after `fit`.
    pub fn set_sink(&mut self, sink: Box<dyn VisualizationSink>) {
        self.sink = Some(sink);
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    /// Detaches and returns the model.
    pub fn take_model(&mut self) -> Option<M> {
        self.model.take()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn data_shape(&self) -> (usize, usize) {
        self.data_shape
    }

    pub fn train_size(&self) -> usize {
        self.train.len()
    }

    pub fn val_size(&self) -> usize {
        self.val.len()
    }

    pub fn train_partition(&self) -> &Partition {
        self.train.partition()
    }

    pub fn val_partition(&self) -> &Partition {
        self.val.partition()
    }

    pub fn train_progress(&self) -> &ProgressNotifier {
        &self.train_prog
    }

    pub fn val_progress(&self) -> &ProgressNotifier {
        &self.val_prog
    }

    /// Next training sample. See `SampleCursor::next`.
    pub fn next(&mut self) -> Result<ArrayView2<'_, f32>> {
        self.train.next()
    }

    /// Next validation sample. See `SampleCursor::next`.
    pub fn val_next(&mut self) -> Result<ArrayView2<'_, f32>> {
        self.val.next()
    }

    /// Rewinds both cursors and both progress notifiers.
    pub fn reset(&mut self) {
        self.train.reset();
        self.val.reset();
        self.train_prog.reset();
        self.val_prog.reset();
    }

    /// Fits the attached model for `epochs` epochs.
    ///
    /// Whatever happens, the model is left with learning enabled when this returns.
    ///
    /// # Returns
    /// The recorded potentials of both partitions and the per-epoch statistics.
    ///
    /// # Errors
    /// `ModelNotSet` without a model, `InvalidConfig` for zero epochs, or any
    /// error raised by the model, the cursors or the evaluator along the run.
    pub fn fit(&mut self, epochs: usize) -> Result<FitReport> {
        if epochs == 0 {
            return Err(SnnErr::InvalidConfig("epochs must be greater than 0".into()));
        }

        let mut model = self.model.take().ok_or(SnnErr::ModelNotSet)?;

        info!(
            "fitting model on {} samples, validating on {} samples",
            self.train.len(),
            self.val.len()
        );

        if !model.is_learning_enabled() {
            model.unfreeze();
            warn!("model weights were automatically unfrozen");
        }

        let result = self.run(&mut model, epochs);

        model.unfreeze();
        self.model = Some(model);

        result
    }

    fn run(&mut self, model: &mut M, epochs: usize) -> Result<FitReport> {
        let (out_h, out_w) = model.output_shape();
        let train_size = self.train.len();
        let test_freq = self.config.test_freq.get();
        let visualize_freq = self.config.visualize_freq.get();

        let mut train_potentials = Array4::<f32>::zeros((epochs, train_size, out_h, out_w));
        let mut val_potentials = Array4::<f32>::zeros((epochs, self.val.len(), out_h, out_w));
        let mut feature_maps = Vec::new();
        let mut stats = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            info!("epoch {}/{epochs}", epoch + 1);
            let start = Instant::now();
            self.reset();

            model.unfreeze();
            let train_scores = sweep(
                &mut self.train,
                &mut self.train_prog,
                &self.evaluator,
                model,
                train_potentials.index_axis_mut(Axis(0), epoch),
                test_freq,
                |step, model| {
                    let seen = epoch * train_size + step + 1;
                    if seen % visualize_freq == 0 {
                        debug!(samples_seen = seen; "captured feature maps");
                        feature_maps.push(FeatureMapSnapshot {
                            samples_seen: seen,
                            maps: model.feature_maps(),
                        });
                    }
                },
            )?;

            model.freeze();
            let val_scores = sweep(
                &mut self.val,
                &mut self.val_prog,
                &self.evaluator,
                model,
                val_potentials.index_axis_mut(Axis(0), epoch),
                test_freq,
                |_, _| {},
            )?;
            model.unfreeze();

            let elapsed = start.elapsed();
            info!("elapsed time {}", format_elapsed(elapsed));

            stats.push(EpochStats {
                epoch,
                train_scores,
                val_scores,
                elapsed,
            });
        }

        info!("done");

        if let Some(sink) = self.sink.as_mut() {
            let outputs = class_outputs(self.train.partition(), model)?;
            sink.feature_maps(&feature_maps, visualize_freq)?;
            sink.class_outputs(&outputs)?;
        }

        Ok(FitReport {
            train_potentials,
            val_potentials,
            epochs: stats,
            feature_maps,
        })
    }
}

/// Runs every sample of `cursor` through the model, storing the outputs and
/// evaluating each completed window of `test_freq` outputs.
///
/// # Returns
/// The accuracy of every completed window.
fn sweep<M, F>(
    cursor: &mut SampleCursor,
    progress: &mut ProgressNotifier,
    evaluator: &WindowedEvaluator,
    model: &mut M,
    mut potentials: ArrayViewMut3<f32>,
    test_freq: usize,
    mut on_step: F,
) -> Result<Vec<f32>>
where
    M: SpikingModel,
    F: FnMut(usize, &M),
{
    let expected = model.output_shape();
    let mut score = Metric::Pending;
    let mut scores = Vec::new();

    for step in 0..cursor.len() {
        let output = model.forward(cursor.next()?)?;

        if output.dim() != expected {
            let (h, w) = output.dim();
            return Err(SnnErr::ShapeMismatch {
                what: "model output",
                got: vec![h, w],
                expected: vec![expected.0, expected.1],
            });
        }

        potentials.index_axis_mut(Axis(0), step).assign(&output);
        on_step(step, &*model);

        if (step + 1) % test_freq == 0 {
            let window = step + 1 - test_freq..step + 1;
            let accuracy = evaluator.evaluate(
                potentials.slice(s![window.clone(), .., ..]),
                &cursor.labels()[window],
            )?;

            debug!(step = step, accuracy = accuracy; "evaluated window");
            scores.push(accuracy);
            score = Metric::Value(accuracy);
        }

        progress.update([(ACCURACY, score)]);
    }

    progress.finish([(MEAN_ACCURACY, Metric::from(mean(&scores)))]);
    Ok(scores)
}

/// The frozen model's output for the first sample of every class in `partition`.
fn class_outputs<M>(partition: &Partition, model: &mut M) -> Result<Vec<ClassOutput>>
where
    M: SpikingModel,
{
    let classes: BTreeSet<_> = partition.labels().iter().copied().collect();
    let mut seen = BTreeSet::new();
    let mut outputs = Vec::with_capacity(classes.len());

    model.freeze();

    for (i, &label) in partition.labels().iter().enumerate() {
        if seen.len() == classes.len() {
            break;
        }

        if seen.insert(label) {
            outputs.push(ClassOutput {
                label,
                output: model.forward(partition.sample(i))?,
            });
        }
    }

    model.unfreeze();
    Ok(outputs)
}
