//! Validated font jobs.
//!
//! A [`FontJob`] can only be built through its constructors, which reject empty
//! input lists, unsupported files and unresolved destinations. Everything that
//! reaches the pipeline has passed those checks.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Local};
use typeforge_font_flavor::Container;

use crate::{
    config::{CONVERT_EXTENSIONS, INSTANCE_EXTENSIONS, MERGE_EXTENSIONS, MIN_MERGE_INPUTS, TIMESTAMP_FORMAT},
    error::ValidationError,
    intake::has_extension,
    merge::MergeBackend,
    weights::WeightSelection,
};

/// Output format of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Ttf,
    Otf,
    Woff,
    Woff2,
}

impl TargetFormat {
    pub const ALL: [Self; 4] = [Self::Ttf, Self::Otf, Self::Woff, Self::Woff2];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Otf => "otf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }

    pub fn container(self) -> Container {
        match self {
            Self::Ttf | Self::Otf => Container::Sfnt,
            Self::Woff => Container::Woff,
            Self::Woff2 => Container::Woff2,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::UnknownFormat(s.to_owned()))
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

/// What a job writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Font(TargetFormat),
    Merged,
    InstancePerWeight,
}

/// Tool-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOptions {
    Convert {
        format: TargetFormat,
        /// Characters to keep. `None` skips subsetting; `Some("")` keeps only `.notdef`.
        subset: Option<String>,
    },
    Instance {
        /// Ascending, no duplicates.
        weights: Vec<u16>,
    },
    Merge {
        backend: MergeBackend,
    },
}

/// One user-initiated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontJob {
    inputs: Vec<PathBuf>,
    options: JobOptions,
    destination: PathBuf,
}

impl FontJob {
    /// A conversion of `input` to `format`.
    ///
    /// Without `output` the result is saved next to the input as
    /// `<stem>_<YYYYMMDDHHMM>.<ext>`.
    pub fn convert(
        input: impl Into<PathBuf>,
        format: TargetFormat,
        subset: Option<String>,
        output: Option<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        check_input(&input, CONVERT_EXTENSIONS)?;
        let destination =
            output.unwrap_or_else(|| default_convert_output(&input, format, &Local::now()));
        Ok(Self { inputs: vec![input], options: JobOptions::Convert { format, subset }, destination })
    }

    /// Static instances of `input` at every selected weight.
    ///
    /// Without `output_dir` the instances land next to the source font.
    pub fn instance(
        input: impl Into<PathBuf>,
        weights: &WeightSelection,
        output_dir: Option<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        check_input(&input, INSTANCE_EXTENSIONS)?;
        if weights.is_empty() {
            return Err(ValidationError::NoWeights);
        }
        let destination = output_dir.unwrap_or_else(|| parent_dir(&input));
        Ok(Self {
            inputs: vec![input],
            options: JobOptions::Instance { weights: weights.to_vec() },
            destination,
        })
    }

    /// A merge of `inputs` in order; earlier fonts take precedence.
    pub fn merge(
        inputs: Vec<PathBuf>,
        backend: MergeBackend,
        output: Option<PathBuf>,
    ) -> Result<Self, ValidationError> {
        if inputs.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        if inputs.len() < MIN_MERGE_INPUTS {
            return Err(ValidationError::TooFewMergeInputs(inputs.len()));
        }
        for input in &inputs {
            if !has_extension(input, MERGE_EXTENSIONS) {
                return Err(ValidationError::UnsupportedFile(input.clone()));
            }
        }
        let destination = output.ok_or(ValidationError::MissingOutput)?;
        Ok(Self { inputs, options: JobOptions::Merge { backend }, destination })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// The first input; the only one for conversion and instancing.
    pub fn input(&self) -> &Path {
        &self.inputs[0]
    }

    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Output file, or output directory for instancing.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn output_kind(&self) -> OutputKind {
        match &self.options {
            JobOptions::Convert { format, .. } => OutputKind::Font(*format),
            JobOptions::Instance { .. } => OutputKind::InstancePerWeight,
            JobOptions::Merge { .. } => OutputKind::Merged,
        }
    }
}

/// `<dir>/<stem>_<timestamp>.<ext>` for a conversion started at `now`.
pub fn default_convert_output(input: &Path, format: TargetFormat, now: &DateTime<Local>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
    let name = format!("{stem}_{}.{}", now.format(TIMESTAMP_FORMAT), format.extension());
    parent_dir(input).join(name)
}

/// File name of the instance of `source` at `weight`.
pub fn instance_file_name(source: &Path, weight: u16) -> String {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
    format!("{stem}-{weight}.ttf")
}

fn check_input(input: &Path, extensions: &[&str]) -> Result<(), ValidationError> {
    if input.as_os_str().is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    if !has_extension(input, extensions) {
        return Err(ValidationError::UnsupportedFile(input.to_path_buf()));
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("WOFF2".parse::<TargetFormat>(), Ok(TargetFormat::Woff2));
        assert_eq!(".otf".parse::<TargetFormat>(), Ok(TargetFormat::Otf));
        assert_eq!(
            "eot".parse::<TargetFormat>(),
            Err(ValidationError::UnknownFormat("eot".into()))
        );
    }

    #[test]
    fn ttf_and_otf_share_the_sfnt_container() {
        assert_eq!(TargetFormat::Ttf.container(), Container::Sfnt);
        assert_eq!(TargetFormat::Otf.container(), Container::Sfnt);
        assert_eq!(TargetFormat::Woff.container(), Container::Woff);
    }

    #[test]
    fn default_output_is_timestamped() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let path = default_convert_output(Path::new("fonts/Inter.ttf"), TargetFormat::Woff2, &now);
        assert_eq!(path, PathBuf::from("fonts/Inter_202403090705.woff2"));

        let bare = default_convert_output(Path::new("Inter.otf"), TargetFormat::Ttf, &now);
        assert_eq!(bare, PathBuf::from("./Inter_202403090705.ttf"));
    }

    #[test]
    fn convert_rejects_unknown_extension() {
        let err = FontJob::convert("notes.txt", TargetFormat::Ttf, None, None).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFile("notes.txt".into()));
        assert_eq!(
            FontJob::convert("", TargetFormat::Ttf, None, None).unwrap_err(),
            ValidationError::EmptySelection
        );
    }

    #[test]
    fn convert_keeps_explicit_output() {
        let job = FontJob::convert(
            "a/Font.WOFF",
            TargetFormat::Ttf,
            Some("abc".into()),
            Some("out/x.ttf".into()),
        )
        .unwrap();
        assert_eq!(job.destination(), Path::new("out/x.ttf"));
        assert_eq!(job.output_kind(), OutputKind::Font(TargetFormat::Ttf));
    }

    #[test]
    fn instance_defaults_to_source_directory() {
        let job = FontJob::instance("fonts/VF.ttf", &WeightSelection::presets(), None).unwrap();
        assert_eq!(job.destination(), Path::new("fonts"));
        assert_eq!(job.output_kind(), OutputKind::InstancePerWeight);
    }

    #[test]
    fn instance_needs_weights() {
        let err = FontJob::instance("VF.ttf", &WeightSelection::new(), None).unwrap_err();
        assert_eq!(err, ValidationError::NoWeights);
        let err = FontJob::instance("VF.woff2", &WeightSelection::presets(), None).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFile("VF.woff2".into()));
    }

    #[test]
    fn merge_needs_two_inputs_and_an_output() {
        let backend = MergeBackend::Library;
        assert_eq!(
            FontJob::merge(vec![], backend.clone(), Some("m.ttf".into())).unwrap_err(),
            ValidationError::EmptySelection
        );
        assert_eq!(
            FontJob::merge(vec!["a.ttf".into()], backend.clone(), Some("m.ttf".into())).unwrap_err(),
            ValidationError::TooFewMergeInputs(1)
        );
        assert_eq!(
            FontJob::merge(vec!["a.ttf".into(), "b.ttf".into()], backend.clone(), None).unwrap_err(),
            ValidationError::MissingOutput
        );
        let job =
            FontJob::merge(vec!["a.ttf".into(), "b.otf".into()], backend, Some("m.ttf".into()))
                .unwrap();
        assert_eq!(job.inputs().len(), 2);
        assert_eq!(job.output_kind(), OutputKind::Merged);
    }

    #[test]
    fn instance_names_use_stem_and_weight() {
        assert_eq!(instance_file_name(Path::new("dir/Roboto[wght].ttf"), 300), "Roboto[wght]-300.ttf");
    }
}
