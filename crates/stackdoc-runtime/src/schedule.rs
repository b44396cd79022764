use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tracing::warn;

pub const DEFAULT_SCHEDULE_TIME: &str = "02:00";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Parses an IANA timezone name, falling back to UTC with a warning.
pub fn resolve_timezone(raw: &str) -> Tz {
    let trimmed = raw.trim();
    match trimmed.parse::<Tz>() {
        Ok(timezone) => timezone,
        Err(_) => {
            warn!(timezone = trimmed, "unknown timezone, using UTC");
            Tz::UTC
        }
    }
}

/// One run per day at a fixed local time.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    hour: u32,
    minute: u32,
    timezone: Tz,
    schedule: Schedule,
}

impl DailySchedule {
    /// Parses `HH:MM` (hour 0-23, minute 0-59).
    pub fn parse(raw: &str, timezone: Tz) -> Result<Self> {
        let trimmed = raw.trim();
        let (hour_raw, minute_raw) = trimmed
            .split_once(':')
            .ok_or_else(|| anyhow!("invalid schedule time '{trimmed}': expected HH:MM"))?;
        let hour = parse_component(hour_raw, "hour", 23, trimmed)?;
        let minute = parse_component(minute_raw, "minute", 59, trimmed)?;
        let expression = format!("0 {minute} {hour} * * * *");
        let schedule = Schedule::from_str(&expression)
            .with_context(|| format!("invalid cron expression '{expression}'"))?;
        Ok(Self {
            hour,
            minute,
            timezone,
            schedule,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn cron_expression(&self) -> String {
        format!("0 {} {} * * * *", self.minute, self.hour)
    }

    /// First trigger strictly after `from`, in the schedule's timezone.
    pub fn next_after(&self, from: DateTime<Utc>) -> Result<DateTime<Tz>> {
        let local = from.with_timezone(&self.timezone);
        self.schedule
            .after(&local)
            .next()
            .ok_or_else(|| {
                anyhow!(
                    "schedule '{}' has no future occurrence",
                    self.cron_expression()
                )
            })
    }
}

fn parse_component(raw: &str, label: &str, max: u32, original: &str) -> Result<u32> {
    let digits = raw.trim();
    if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        bail!("invalid schedule time '{original}': {label} must be numeric");
    }
    let value = digits
        .parse::<u32>()
        .with_context(|| format!("invalid schedule time '{original}'"))?;
    if value > max {
        bail!("invalid schedule time '{original}': {label} must be between 0 and {max}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    use super::{resolve_timezone, DailySchedule};

    #[test]
    fn unit_parse_builds_daily_cron_expression() {
        let schedule = DailySchedule::parse("02:30", Tz::UTC).expect("parse schedule");
        assert_eq!((schedule.hour(), schedule.minute()), (2, 30));
        assert_eq!(schedule.cron_expression(), "0 30 2 * * * *");
    }

    #[test]
    fn regression_parse_rejects_malformed_times() {
        for raw in ["24:00", "12:60", "2", "ab:cd", "-1:00", "", "1:2:3"] {
            let error = DailySchedule::parse(raw, Tz::UTC).expect_err("malformed time");
            assert!(
                error.to_string().contains("invalid schedule time"),
                "{raw}: {error}"
            );
        }
    }

    #[test]
    fn unit_next_after_is_later_the_same_day_or_tomorrow() {
        let schedule = DailySchedule::parse("02:00", Tz::UTC).expect("parse schedule");
        let before = Utc.with_ymd_and_hms(2026, 3, 10, 1, 15, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();

        let next = schedule.next_after(before).expect("next");
        assert_eq!(
            next.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap()
        );
        let next = schedule.next_after(after).expect("next");
        assert_eq!(
            next.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 11, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn functional_next_after_respects_timezone() {
        let schedule =
            DailySchedule::parse("02:00", chrono_tz::America::New_York).expect("parse schedule");
        let from = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let next = schedule.next_after(from).expect("next");
        assert_eq!(
            next.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 1, 16, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn unit_unknown_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone("Europe/Berlin"), chrono_tz::Europe::Berlin);
        assert_eq!(resolve_timezone("Mars/Olympus"), Tz::UTC);
    }
}
