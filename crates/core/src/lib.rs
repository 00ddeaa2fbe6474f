//! Intake, validation and delegation behind the typeforge font tools.
//!
//! The tools are a converter (TTF, OTF, WOFF and WOFF2 with optional
//! subsetting), a weight instancer for variable fonts, and two mergers: one
//! running an external program and one using the built-in merger.
//!
//! Every action goes through the same steps: collect paths into a session,
//! build a validated [`FontJob`], then [`execute`] it to get a [`Report`].

pub mod config;
pub mod convert;
mod error;
pub mod instance;
pub mod intake;
pub mod io;
pub mod job;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod session;
pub mod weights;

pub use error::ValidationError;
pub use instance::WeightOutcome;
pub use job::{FontJob, JobOptions, OutputKind, TargetFormat};
pub use merge::{MergeBackend, ProcessOutcome};
pub use pipeline::execute;
pub use progress::{NoProgress, Progress};
pub use report::Report;
pub use session::{ConvertSession, InstanceSession, MergeSession, SessionState};
pub use weights::WeightSelection;
