use std::time::Duration;

/// How a single broadcast copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Recipient blocked the bot.
    Blocked,
    /// Recipient account is deactivated or the peer is no longer valid.
    Gone,
    Failed,
}

/// Running per-class counts of a broadcast.
///
/// `failed` counts every recipient that did not get the message, so blocked
/// and gone recipients show up both in their own class and in `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastTally {
    pub total: usize,
    pub delivered: usize,
    pub failed: usize,
    pub blocked: usize,
    pub gone: usize,
}

impl BroadcastTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: Delivery) {
        match outcome {
            Delivery::Delivered => self.delivered += 1,
            Delivery::Blocked => {
                self.blocked += 1;
                self.failed += 1;
            }
            Delivery::Gone => {
                self.gone += 1;
                self.failed += 1;
            }
            Delivery::Failed => self.failed += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Render an elapsed duration as `H:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_counts_as_failed() {
        let mut tally = BroadcastTally::new(3);
        tally.record(Delivery::Delivered);
        tally.record(Delivery::Blocked);
        tally.record(Delivery::Delivered);

        assert_eq!(tally.delivered, 2);
        assert_eq!(tally.blocked, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.processed(), 3);
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_elapsed(Duration::from_millis(83_900)), "0:01:23");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 5)), "3:00:05");
    }
}
