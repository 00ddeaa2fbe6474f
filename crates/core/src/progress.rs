//! Progress callbacks for long-running jobs.
//!
//! Values are milestones, not measurements. Jobs cannot be cancelled through
//! this interface.

/// Receives progress milestones from the pipeline.
pub trait Progress {
    fn start(&mut self, label: &str);

    /// `percent` is in `0..=100`.
    fn advance(&mut self, percent: u8, message: &str);

    fn finish(&mut self);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _label: &str) {}

    fn advance(&mut self, _percent: u8, _message: &str) {}

    fn finish(&mut self) {}
}

/// Percentage of `done` out of `total` steps.
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_steps() {
        assert_eq!(percent(0, 9), 0);
        assert_eq!(percent(3, 9), 33);
        assert_eq!(percent(9, 9), 100);
        assert_eq!(percent(12, 9), 100);
        assert_eq!(percent(0, 0), 100);
    }
}
