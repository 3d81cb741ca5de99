//! Weekly ordering hours.
//!
//! Independently of the admin flag, the restaurant only takes orders on some
//! days within a time window. The schedule is written as
//! `"<days> <HH:MM>-<HH:MM>"`, e.g. `"thu,fri,sat,sun 20:30-23:49"`. Both ends
//! are inclusive at minute precision.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Weekday};

/// Errors parsing an [`OrderingSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("expected '<days> <HH:MM>-<HH:MM>', got '{0}'")]
    Format(String),
    #[error("invalid weekday '{0}'")]
    Weekday(String),
    #[error("invalid time '{0}'")]
    Time(String),
    #[error("schedule must name at least one day")]
    NoDays,
}

/// Days of the week and the daily window during which orders are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingSchedule {
    days: Vec<Weekday>,
    opens: NaiveTime,
    closes: NaiveTime,
}

impl OrderingSchedule {
    /// Create a schedule from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NoDays`] if `days` is empty.
    pub fn new(days: Vec<Weekday>, opens: NaiveTime, closes: NaiveTime) -> Result<Self, ScheduleError> {
        if days.is_empty() {
            return Err(ScheduleError::NoDays);
        }
        Ok(Self {
            days,
            opens,
            closes,
        })
    }

    /// Whether orders are accepted at the given instant, in its own timezone.
    ///
    /// A window whose closing time is before its opening time runs past
    /// midnight; the early-morning part belongs to the previous day.
    ///
    /// ```
    /// use chrono::{FixedOffset, TimeZone};
    /// use la_comanda_core::OrderingSchedule;
    ///
    /// let schedule: OrderingSchedule = "thu,fri,sat,sun 20:30-23:49".parse().unwrap();
    /// let tz = FixedOffset::west_opt(3 * 3600).unwrap();
    ///
    /// // Thursday 2026-10-15
    /// assert!(schedule.is_open(&tz.with_ymd_and_hms(2026, 10, 15, 21, 0, 0).unwrap()));
    /// assert!(!schedule.is_open(&tz.with_ymd_and_hms(2026, 10, 15, 23, 50, 0).unwrap()));
    /// // Wednesday
    /// assert!(!schedule.is_open(&tz.with_ymd_and_hms(2026, 10, 14, 21, 0, 0).unwrap()));
    /// ```
    #[must_use]
    pub fn is_open<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let now = minute_of_day(at.hour(), at.minute());
        let opens = minute_of_day(self.opens.hour(), self.opens.minute());
        let closes = minute_of_day(self.closes.hour(), self.closes.minute());
        let today = at.weekday();

        if opens <= closes {
            self.days.contains(&today) && (opens..=closes).contains(&now)
        } else {
            (self.days.contains(&today) && now >= opens)
                || (self.days.contains(&today.pred()) && now <= closes)
        }
    }

    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    #[must_use]
    pub const fn opens(&self) -> NaiveTime {
        self.opens
    }

    #[must_use]
    pub const fn closes(&self) -> NaiveTime {
        self.closes
    }
}

const fn minute_of_day(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

fn parse_time(s: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| ScheduleError::Time(s.to_string()))
}

impl FromStr for OrderingSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (days, window) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| ScheduleError::Format(s.to_string()))?;
        let (opens, closes) = window
            .split_once('-')
            .ok_or_else(|| ScheduleError::Format(s.to_string()))?;

        let days = days
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                d.parse::<Weekday>()
                    .map_err(|_| ScheduleError::Weekday(d.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(days, parse_time(opens)?, parse_time(closes)?)
    }
}

impl fmt::Display for OrderingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self
            .days
            .iter()
            .map(|d| d.to_string().to_lowercase())
            .collect();
        write!(
            f,
            "{} {}-{}",
            days.join(","),
            self.opens.format("%H:%M"),
            self.closes.format("%H:%M")
        )
    }
}
