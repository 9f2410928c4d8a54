//! Coarse progress reporting at 10% boundaries.

/// Tracks bytes received against a declared total and yields each 10%
/// boundary exactly once, even when a single chunk crosses several.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: Option<u64>,
    received: u64,
    last_decile: u8,
}

impl ProgressTracker {
    /// `total` is the declared body length; `None` or zero disables reporting.
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            received: 0,
            last_decile: 0,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Fraction complete in [0.0, 1.0], if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        self.total
            .map(|t| (self.received as f64 / t as f64).min(1.0))
    }

    /// Record `n` more bytes and return the percentages newly reached.
    pub fn advance(&mut self, n: u64) -> impl Iterator<Item = u8> {
        self.received = self.received.saturating_add(n);
        let previous = self.last_decile;
        if let Some(total) = self.total {
            let done = u128::from(self.received.min(total));
            let decile = (done * 10 / u128::from(total)) as u8;
            self.last_decile = decile.max(previous);
        }
        (previous + 1..=self.last_decile).map(|d| d * 10)
    }
}
