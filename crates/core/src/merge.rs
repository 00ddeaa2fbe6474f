//! Merging fonts through an external program or the built-in merger.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use typeforge_font_merger::merge_fonts_bytes;

use crate::{
    config::{DEFAULT_MERGER, MERGER_OUTPUT_FLAG},
    io::FontFile,
};

/// How a merge job is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeBackend {
    /// Run an external merge executable such as `pyftmerge`.
    External { program: String },
    /// Use the merger library in-process.
    Library,
}

impl Default for MergeBackend {
    fn default() -> Self {
        Self::External { program: DEFAULT_MERGER.to_owned() }
    }
}

/// Exit status and captured streams of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Merge `inputs` in order and write the result to `output`.
pub fn merge(backend: &MergeBackend, inputs: &[PathBuf], output: &Path) -> Result<PathBuf> {
    info!("merging {} fonts:", inputs.len());
    for input in inputs {
        info!("  - {}", input.display());
    }
    match backend {
        MergeBackend::External { program } => merge_external(program, inputs, output)?,
        MergeBackend::Library => merge_library(inputs, output)?,
    }
    Ok(output.to_path_buf())
}

/// Arguments passed to the external merger.
pub fn external_args(inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
    let mut flag = OsString::from(MERGER_OUTPUT_FLAG);
    flag.push(output.as_os_str());
    std::iter::once(flag)
        .chain(inputs.iter().map(|input| input.as_os_str().to_owned()))
        .collect()
}

/// Run `program` and capture its output.
pub fn run_merger(program: &str, inputs: &[PathBuf], output: &Path) -> Result<ProcessOutcome> {
    let args = external_args(inputs, output);
    debug!("running {program} {args:?}");
    let out = Command::new(program)
        .args(&args)
        .output()
        .with_context(|| format!("failed to launch {program}"))?;
    Ok(ProcessOutcome {
        status: out.status,
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}

/// Run the external merger; a nonzero exit fails with its stderr.
pub fn merge_external(program: &str, inputs: &[PathBuf], output: &Path) -> Result<ProcessOutcome> {
    FontFile::new(output).ensure_parent_dir()?;
    let outcome = run_merger(program, inputs, output)?;
    if !outcome.success() {
        bail!("{program} exited with {}: {}", outcome.status, outcome.stderr.trim_end());
    }
    if !outcome.stdout.trim().is_empty() {
        debug!("{program}: {}", outcome.stdout.trim_end());
    }
    info!("merged font: {}", output.display());
    Ok(outcome)
}

/// Merge with the built-in merger.
pub fn merge_library(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let font_data: Vec<Vec<u8>> = inputs
        .iter()
        .map(|path| FontFile::new(path).read())
        .collect::<Result<_>>()?;
    let font_refs: Vec<&[u8]> = font_data.iter().map(Vec::as_slice).collect();

    let merged = merge_fonts_bytes(&font_refs).context("failed to merge fonts")?;
    FontFile::new(output).write(&merged)?;

    let size = merged.len() as f64 / 1024.0 / 1024.0;
    info!("merged font: {} ({size:.2} MB)", output.display());
    Ok(())
}
