use std::{fmt, path::PathBuf};

use crate::instance::WeightOutcome;

/// What a finished job produced.
#[derive(Debug)]
pub enum Report {
    Converted { output: PathBuf },
    Merged { output: PathBuf },
    Instanced(Vec<WeightOutcome>),
}

impl Report {
    /// Number of items that failed. Only instancing can partially fail.
    pub fn failures(&self) -> usize {
        match self {
            Self::Instanced(outcomes) => outcomes.iter().filter(|o| !o.is_ok()).count(),
            Self::Converted { .. } | Self::Merged { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    /// Every file written.
    pub fn outputs(&self) -> Vec<&PathBuf> {
        match self {
            Self::Converted { output } | Self::Merged { output } => vec![output],
            Self::Instanced(outcomes) => {
                outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect()
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converted { output } => write!(f, "Converted: {}", output.display()),
            Self::Merged { output } => write!(f, "Merged: {}", output.display()),
            Self::Instanced(outcomes) => {
                let created = outcomes.len() - self.failures();
                write!(f, "Created {created} of {} instances", outcomes.len())?;
                for outcome in outcomes {
                    match &outcome.result {
                        Ok(path) => write!(f, "\n  {}: {}", outcome.weight, path.display())?,
                        Err(err) => write!(f, "\n  {}: failed: {err:#}", outcome.weight)?,
                    }
                }
                Ok(())
            }
        }
    }
}
