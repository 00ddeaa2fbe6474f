//! CLI definitions and command dispatch.

use std::{fs::read_to_string, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use typeforge_core::{
    ConvertSession, InstanceSession, MergeBackend, MergeSession, Report, TargetFormat,
    config::{DEFAULT_MERGER, PROJECT_LINKS, TOOL_NAME},
};

use crate::progress::LogProgress;

#[derive(Parser)]
#[command(name = "typeforge", version)]
#[command(about = "Convert, subset, instance and merge fonts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a font between TTF, OTF, WOFF and WOFF2, optionally subsetting it.
    Convert {
        /// Font file; only the first supported file is used.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// ttf, otf, woff or woff2.
        #[arg(short, long, default_value = "ttf")]
        format: TargetFormat,
        /// Keep only the glyphs for these characters.
        #[arg(short, long, conflicts_with = "subset_file")]
        subset: Option<String>,
        /// Keep only the glyphs for the characters in this text file.
        #[arg(long)]
        subset_file: Option<PathBuf>,
        /// Defaults to `<name>_<YYYYMMDDHHMM>.<ext>` next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create static instances of a variable font at fixed weights.
    Instance {
        #[arg(required = true)]
        input: PathBuf,
        /// Weight between 100 and 900; repeatable.
        #[arg(short, long = "weight")]
        weights: Vec<String>,
        /// Every weight from 100 to 900 in steps of 100.
        #[arg(long)]
        all_weights: bool,
        /// Defaults to the directory of the input font.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Merge fonts with an external merger program.
    Merge {
        /// Fonts or directories, in precedence order.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        /// Program invoked as `<merger> --output-file=<output> <inputs>...`.
        #[arg(long, default_value = DEFAULT_MERGER)]
        merger: String,
    },
    /// Merge TrueType fonts with the built-in merger.
    MergeLib {
        /// Fonts or directories, in precedence order.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show version, build date and project links.
    About,
}

impl Commands {
    pub fn run(self) -> Result<()> {
        let mut progress = LogProgress::default();
        let report = match self {
            Commands::Convert { inputs, format, subset, subset_file, output } => {
                let mut session = ConvertSession::new();
                session.add_paths(&inputs)?;
                session.format = format;
                session.subset = match subset_file {
                    Some(path) => Some(
                        read_to_string(&path)
                            .with_context(|| format!("failed to read {}", path.display()))?,
                    ),
                    None => subset,
                };
                session.output = output;
                session.run(&mut progress)?
            }
            Commands::Instance { input, weights, all_weights, output_dir } => {
                let mut session = InstanceSession::new();
                session.add_paths([&input])?;
                for weight in &weights {
                    session.weights_mut().add_text(weight)?;
                }
                if all_weights {
                    session.weights_mut().add_presets();
                }
                session.output_dir = output_dir;
                session.run(&mut progress)?
            }
            Commands::Merge { inputs, output, merger } => {
                run_merge(MergeBackend::External { program: merger }, &inputs, output, &mut progress)?
            }
            Commands::MergeLib { inputs, output } => {
                run_merge(MergeBackend::Library, &inputs, output, &mut progress)?
            }
            Commands::About => {
                println!("{}", about());
                return Ok(());
            }
        };

        println!("{report}");
        let failures = report.failures();
        if failures > 0 {
            bail!("{failures} weight(s) failed");
        }
        Ok(())
    }
}

fn run_merge(
    backend: MergeBackend,
    inputs: &[PathBuf],
    output: PathBuf,
    progress: &mut LogProgress,
) -> Result<Report> {
    let mut session = MergeSession::new(backend);
    session.add_paths(inputs)?;
    session.output = Some(output);
    session.run(progress)
}

/// Text printed by `about`.
pub fn about() -> String {
    let mut text = format!(
        "{TOOL_NAME} {}\nBuilt {}",
        env!("CARGO_PKG_VERSION"),
        env!("TYPEFORGE_BUILD_DATE")
    );
    for (label, url) in PROJECT_LINKS {
        text.push_str(&format!("\n{label}: {url}"));
    }
    text
}
