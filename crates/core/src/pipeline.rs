//! Dispatch of validated jobs to their delegates.

use anyhow::Result;

use crate::{
    convert::convert_font,
    instance::instance_weights,
    job::{FontJob, JobOptions},
    merge::merge,
    progress::Progress,
    report::Report,
};

/// Run `job` to completion on the calling thread.
///
/// Conversion and merging fail as a whole. Instancing always returns a report
/// with one outcome per weight.
pub fn execute(job: &FontJob, progress: &mut dyn Progress) -> Result<Report> {
    match job.options() {
        JobOptions::Convert { format, subset } => {
            let output =
                convert_font(job.input(), job.destination(), *format, subset.as_deref(), progress)?;
            Ok(Report::Converted { output })
        }
        JobOptions::Instance { weights } => {
            let outcomes = instance_weights(job.input(), job.destination(), weights, progress);
            Ok(Report::Instanced(outcomes))
        }
        JobOptions::Merge { backend } => {
            progress.start("merging");
            let output = merge(backend, job.inputs(), job.destination())?;
            progress.advance(100, "merged");
            progress.finish();
            Ok(Report::Merged { output })
        }
    }
}
