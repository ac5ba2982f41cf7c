use std::time::Duration;

/// How long each phase of a lookup took
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingReport {
    /// Time spent obtaining the bulletin (cache or network)
    pub fetch: Duration,

    /// Time spent scanning the bulletin's pages
    pub scan: Duration,
}

impl TimingReport {
    pub fn new(fetch: Duration, scan: Duration) -> Self {
        Self { fetch, scan }
    }

    /// Combined time of both phases
    pub fn total(&self) -> Duration {
        self.fetch + self.scan
    }
}
