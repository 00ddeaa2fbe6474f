use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use typeforge_font_instancer::instantiate_weight;

use crate::{
    io::FontFile,
    job::instance_file_name,
    progress::{Progress, percent},
};

/// Result of instancing one weight.
#[derive(Debug)]
pub struct WeightOutcome {
    pub weight: u16,
    /// Path of the written instance.
    pub result: Result<PathBuf>,
}

impl WeightOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Write one static instance of `input` per weight into `output_dir`.
///
/// Each weight reads and parses the source on its own, so one failure leaves
/// the others untouched. Outcomes follow the order of `weights`.
pub fn instance_weights(
    input: &Path,
    output_dir: &Path,
    weights: &[u16],
    progress: &mut dyn Progress,
) -> Vec<WeightOutcome> {
    progress.start(&format!("instancing {} weights", weights.len()));
    let outcomes = weights
        .iter()
        .enumerate()
        .map(|(i, &weight)| {
            let result = instance_one(input, output_dir, weight);
            let status = if result.is_ok() { "done" } else { "failed" };
            progress.advance(percent(i + 1, weights.len()), &format!("weight {weight} {status}"));
            WeightOutcome { weight, result }
        })
        .collect();
    progress.finish();
    outcomes
}

fn instance_one(input: &Path, output_dir: &Path, weight: u16) -> Result<PathBuf> {
    let data = FontFile::new(input).read()?;
    let instance = instantiate_weight(&data, f32::from(weight))
        .with_context(|| format!("failed to instance {} at weight {weight}", input.display()))?;

    let output = output_dir.join(instance_file_name(input, weight));
    FontFile::new(&output).write(&instance.data)?;

    let size = instance.data.len() as f64 / 1024.0;
    info!("created {} ({size:.1} KB)", output.display());
    Ok(output)
}
