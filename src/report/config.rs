//! Processing options.

/// Options for one processing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    /// Minimum node rating printed in verbose mode.
    pub min_rating: f64,

    /// Print the verbose trace instead of compact verdict lines.
    pub verbose: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            verbose: false,
        }
    }
}

impl ProcessOptions {
    /// Creates options for compact output with no rating threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum rating for verbose output.
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Enables or disables verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
