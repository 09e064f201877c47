use std::{collections::BTreeMap, env};

use anyhow::{Context, bail};
use log::info;

use snn_trainer::{arch::SpikingModel, configs::RunConfig, data::Label, training::Trainer};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        bail!("usage: snn-trainer <config.json>");
    };

    let config =
        RunConfig::from_json_file(&path).with_context(|| format!("cannot load '{path}'"))?;

    let trainer: Trainer<Box<dyn SpikingModel>> = config.trainer()?;

    info!(
        "{} epochs over {} training and {} validation samples, evaluating every {} samples",
        config.epochs,
        trainer.train_size(),
        trainer.val_size(),
        trainer.config().test_freq
    );
    info!(
        "training classes: {}",
        class_counts(trainer.train_partition().labels())
    );
    info!(
        "validation classes: {}",
        class_counts(trainer.val_partition().labels())
    );

    Ok(())
}

fn class_counts(labels: &[Label]) -> String {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }

    counts
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(" ")
}
