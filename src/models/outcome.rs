use chrono::NaiveDate;

/// Result of a deferral check for a fill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferral {
    /// Persisted for the nightly cutover.
    Scheduled,
    /// The caller must compute and submit the events now.
    Immediate,
}

/// Result of a day fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The day is still in progress: it will be filled tonight.
    Scheduled,
    /// Events were handed over now.
    Completed {
        /// Delivered straight away.
        submitted: usize,
        /// Waiting in the retry queue because of rate limiting.
        queued: usize,
    },
}

impl FillOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, FillOutcome::Scheduled)
    }
}

/// Per-day outcome of a range fill. A failed day does not stop the range.
#[derive(Debug, Default)]
pub struct RangeReport {
    pub days: Vec<(NaiveDate, Result<FillOutcome, String>)>,
}

impl RangeReport {
    pub fn processed(&self) -> usize {
        self.days.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&NaiveDate, &String)> {
        self.days.iter().filter_map(|(d, r)| r.as_ref().err().map(|e| (d, e)))
    }

    pub fn is_complete(&self) -> bool {
        self.days.iter().all(|(_, r)| r.is_ok())
    }
}
