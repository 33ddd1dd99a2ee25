//! Periodic wake-ups that survive a processor sleep
//!
//! While suspended the executor does not run, so an `embassy_time::Ticker`
//! falls behind by every period of the sleep and would replay them all
//! back to back on wake. `Cadence` notices a late tick and restarts the
//! ticker instead.

use embassy_time::{Duration, Instant, Ticker};

pub struct Cadence {
    ticker: Ticker,
    period: Duration,
    last: Instant,
}

impl Cadence {
    pub fn every(period: Duration) -> Self {
        Self {
            ticker: Ticker::every(period),
            period,
            last: Instant::now(),
        }
    }

    /// Wait for the next period
    pub async fn next(&mut self) {
        self.ticker.next().await;

        let now = Instant::now();
        if now.duration_since(self.last) > self.period * 2 {
            // Missed periods are dropped, not replayed
            self.ticker.reset();
        }
        self.last = now;
    }
}
