use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Time left until a target instant, broken down for display.
///
/// `days` is not carried into larger units; the remaining fields are the
/// truncated remainder within the partial day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub total_ms: u64,
}

impl Countdown {
    /// Countdown from `now` to `target`.
    ///
    /// All-zero when `target` is absent or not after `now`.
    pub fn until(now: NaiveDateTime, target: Option<NaiveDateTime>) -> Self {
        let Some(target) = target else {
            return Self::default();
        };
        let diff = (target - now).num_milliseconds();
        if diff <= 0 {
            return Self::default();
        }
        Self::from_millis(diff.unsigned_abs())
    }

    /// Decompose a millisecond span, truncating at each level.
    pub fn from_millis(total_ms: u64) -> Self {
        Self {
            days: total_ms / MS_PER_DAY,
            hours: (total_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (total_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (total_ms % MS_PER_MINUTE) / MS_PER_SECOND,
            total_ms,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_ms == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Countdown from `now` to `target`; see [`Countdown::until`].
pub fn countdown(now: NaiveDateTime, target: Option<NaiveDateTime>) -> Countdown {
    Countdown::until(now, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn half_day_before_transition() {
        let c = countdown(dt(25, 12, 0, 0), Some(dt(30, 0, 0, 0)));
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (4, 12, 0, 0));
        assert_eq!(c.total_ms, (4 * 24 + 12) * MS_PER_HOUR);
    }

    #[test]
    fn absent_target_is_zero() {
        let c = countdown(dt(25, 12, 0, 0), None);
        assert_eq!(c, Countdown::default());
        assert!(c.is_zero());
    }

    #[test]
    fn elapsed_target_is_zero() {
        assert!(countdown(dt(30, 0, 0, 1), Some(dt(30, 0, 0, 0))).is_zero());
        assert!(countdown(dt(30, 0, 0, 0), Some(dt(30, 0, 0, 0))).is_zero());
    }

    #[test]
    fn sub_second_remainder_is_truncated() {
        let c = Countdown::from_millis(MS_PER_DAY + 3 * MS_PER_HOUR + 61_999);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (1, 3, 1, 1));
    }

    #[test]
    fn display_pads_clock_fields() {
        let c = countdown(dt(29, 22, 55, 3), Some(dt(30, 0, 0, 0)));
        assert_eq!(c.to_string(), "0d 01:04:57");
    }
}
