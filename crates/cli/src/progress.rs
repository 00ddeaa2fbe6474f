use log::{debug, info};
use typeforge_core::Progress;

/// Logs progress milestones at info level.
#[derive(Debug, Default)]
pub struct LogProgress {
    label: String,
}

impl Progress for LogProgress {
    fn start(&mut self, label: &str) {
        self.label = label.to_owned();
        info!("{label}...");
    }

    fn advance(&mut self, percent: u8, message: &str) {
        info!("[{percent:>3}%] {message}");
    }

    fn finish(&mut self) {
        debug!("finished {}", self.label);
    }
}
