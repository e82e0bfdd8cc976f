use chrono::{DateTime, TimeDelta, Utc};

/// Hands out insert timestamps that never go backwards, even if the system clock does.
/// Callers serialize access together with the insert the timestamp belongs to.
pub(crate) struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub(crate) fn starting_after(last: Option<DateTime<Utc>>) -> Self {
        Self { last }
    }

    pub(crate) fn next(&mut self) -> DateTime<Utc> {
        self.next_from(Utc::now())
    }

    fn next_from(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let timestamp = match self.last {
            Some(previous) if now <= previous => previous + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last = Some(timestamp);
        timestamp
    }
}
