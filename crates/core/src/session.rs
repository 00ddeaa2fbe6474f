//! Per-tool working sets.
//!
//! Each session owns the files and options the user has picked so far and
//! turns them into a validated [`FontJob`] when the action is triggered.

use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexSet;
use log::{debug, info};
use typeforge_font_instancer::has_variation_axes;

use crate::{
    config::{CONVERT_EXTENSIONS, INSTANCE_EXTENSIONS, MERGE_EXTENSIONS},
    error::ValidationError,
    intake::{has_extension, scan},
    io::FontFile,
    job::{FontJob, TargetFormat},
    merge::MergeBackend,
    pipeline::execute,
    progress::Progress,
    report::Report,
    weights::WeightSelection,
};

/// Lifecycle of a session's current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    AwaitingInput,
    Ready,
    InFlight,
    Reported,
}

fn run_job(state: &mut SessionState, job: FontJob, progress: &mut dyn Progress) -> Result<Report> {
    *state = SessionState::InFlight;
    let report = execute(&job, progress);
    *state = SessionState::Reported;
    report
}

/// Picks the first accepted path of a drop; the rest are ignored.
fn first_accepted<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
    extensions: &[&str],
) -> Result<PathBuf> {
    let intake = scan(paths, extensions)?;
    let mut accepted = intake.accepted.into_iter();
    match accepted.next() {
        Some(first) => {
            let ignored = accepted.count();
            if ignored > 0 {
                info!("only one font is used at a time; ignoring {ignored} more");
            }
            Ok(first)
        }
        None => match intake.rejected.into_iter().next() {
            Some(rejected) => Err(ValidationError::UnsupportedFile(rejected).into()),
            None => Err(ValidationError::EmptySelection.into()),
        },
    }
}

/// The converter's working set: one font and its target options.
#[derive(Debug, Clone)]
pub struct ConvertSession {
    input: Option<PathBuf>,
    pub format: TargetFormat,
    /// `None` disables subsetting.
    pub subset: Option<String>,
    pub output: Option<PathBuf>,
    state: SessionState,
}

impl Default for ConvertSession {
    fn default() -> Self {
        Self {
            input: None,
            format: TargetFormat::Ttf,
            subset: None,
            output: None,
            state: SessionState::AwaitingInput,
        }
    }
}

impl ConvertSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the first supported font among `paths`.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> Result<&Path> {
        let input = first_accepted(paths, CONVERT_EXTENSIONS)?;
        info!("loaded {}", input.display());
        self.state = SessionState::Ready;
        Ok(self.input.insert(input).as_path())
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn clear(&mut self) {
        self.input = None;
        self.state = SessionState::AwaitingInput;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn job(&self) -> Result<FontJob, ValidationError> {
        let input = self.input.clone().ok_or(ValidationError::EmptySelection)?;
        FontJob::convert(input, self.format, self.subset.clone(), self.output.clone())
    }

    pub fn run(&mut self, progress: &mut dyn Progress) -> Result<Report> {
        let job = self.job()?;
        run_job(&mut self.state, job, progress)
    }
}

/// The instancer's working set: one variable font and the chosen weights.
#[derive(Debug, Clone, Default)]
pub struct InstanceSession {
    input: Option<PathBuf>,
    weights: WeightSelection,
    pub output_dir: Option<PathBuf>,
    state: SessionState,
}

impl InstanceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the first supported font among `paths`.
    ///
    /// Fails with [`ValidationError::NotVariableFont`] when the font's table
    /// directory has no `fvar` entry.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> Result<&Path> {
        let input = first_accepted(paths, INSTANCE_EXTENSIONS)?;
        check_variable(&input)?;
        info!("loaded variable font {}", input.display());
        self.state = SessionState::Ready;
        Ok(self.input.insert(input).as_path())
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn weights(&self) -> &WeightSelection {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut WeightSelection {
        &mut self.weights
    }

    pub fn clear(&mut self) {
        self.input = None;
        self.weights.clear();
        self.state = SessionState::AwaitingInput;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn job(&self) -> Result<FontJob, ValidationError> {
        let input = self.input.clone().ok_or(ValidationError::EmptySelection)?;
        FontJob::instance(input, &self.weights, self.output_dir.clone())
    }

    pub fn run(&mut self, progress: &mut dyn Progress) -> Result<Report> {
        let job = self.job()?;
        run_job(&mut self.state, job, progress)
    }
}

fn check_variable(path: &Path) -> Result<()> {
    if !has_extension(path, INSTANCE_EXTENSIONS) {
        return Err(ValidationError::UnsupportedFile(path.to_path_buf()).into());
    }
    let data = FontFile::new(path).read()?;
    match has_variation_axes(&data) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::NotVariableFont(path.to_path_buf()).into()),
        Err(err) => {
            debug!("{}: {err}", path.display());
            Err(ValidationError::NotVariableFont(path.to_path_buf()).into())
        }
    }
}

/// The merge tools' working set: an ordered, duplicate-free list of fonts.
#[derive(Debug, Clone, Default)]
pub struct MergeSession {
    inputs: IndexSet<PathBuf>,
    pub backend: MergeBackend,
    pub output: Option<PathBuf>,
    state: SessionState,
}

impl MergeSession {
    pub fn new(backend: MergeBackend) -> Self {
        Self { backend, ..Self::default() }
    }

    /// Append every supported font among `paths`, expanding directories.
    ///
    /// Unsupported files and paths already listed are skipped. Returns how many
    /// fonts were added.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> Result<usize> {
        let intake = scan(paths, MERGE_EXTENSIONS)?;
        for rejected in &intake.rejected {
            debug!("skipping unsupported file {}", rejected.display());
        }
        let before = self.inputs.len();
        self.inputs.extend(intake.accepted);
        let added = self.inputs.len() - before;
        if !self.inputs.is_empty() {
            self.state = SessionState::Ready;
        }
        Ok(added)
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let removed = self.inputs.shift_remove(path);
        if self.inputs.is_empty() {
            self.state = SessionState::AwaitingInput;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.state = SessionState::AwaitingInput;
    }

    /// Fonts in merge order.
    pub fn inputs(&self) -> impl Iterator<Item = &Path> {
        self.inputs.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn job(&self) -> Result<FontJob, ValidationError> {
        FontJob::merge(self.inputs.iter().cloned().collect(), self.backend.clone(), self.output.clone())
    }

    pub fn run(&mut self, progress: &mut dyn Progress) -> Result<Report> {
        let job = self.job()?;
        run_job(&mut self.state, job, progress)
    }
}
