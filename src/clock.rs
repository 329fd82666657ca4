//! System-time source
//!
//! The transfer engine records two instants per transfer: the effective date
//! supplied by the client and the system instant at which the journal row was
//! written. The latter comes from a [`Clock`] so that tests can prescribe it.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Monotonic source of system time in UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading the wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock returning a prescribed sequence of instants.
///
/// Once the sequence is down to its final instant, that instant is returned
/// for every subsequent call.
pub struct SequenceClock {
    instants: Mutex<VecDeque<DateTime<Utc>>>,
}

impl SequenceClock {
    /// Panics if `instants` is empty.
    pub fn new<I>(instants: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let instants: VecDeque<_> = instants.into_iter().collect();
        assert!(!instants.is_empty(), "SequenceClock needs at least one instant");
        Self {
            instants: Mutex::new(instants),
        }
    }

    /// Single fixed instant for every call.
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self::new([instant])
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> DateTime<Utc> {
        let mut instants = self.instants.lock().expect("clock mutex poisoned");
        if instants.len() > 1 {
            instants.pop_front().expect("sequence is non-empty")
        } else {
            *instants.front().expect("sequence is non-empty")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn sequence_clock_plays_out_and_repeats_last() {
        let t1 = Utc.with_ymd_and_hms(2023, 6, 22, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2023, 6, 22, 9, 0, 1).unwrap();
        let clock = SequenceClock::new([t1, t2]);

        assert_eq!(clock.now(), t1);
        assert_eq!(clock.now(), t2);
        assert_eq!(clock.now(), t2);
        assert_eq!(clock.now(), t2);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let t = Utc.with_ymd_and_hms(2023, 6, 22, 9, 0, 0).unwrap();
        let clock = SequenceClock::fixed(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), t);
    }
}
