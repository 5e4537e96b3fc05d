// Schedule parsing and next-firing calculation
//
// Two schedule shapes are supported: a cron expression evaluated in a fixed
// timezone, and a fixed interval between firings.

use crate::errors::ScheduleError;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use cron::Schedule as CronSchedule;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// Helper functions for Tz serialization
fn serialize_tz<S>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&tz.to_string())
}

fn deserialize_tz<'de, D>(deserializer: D) -> Result<Tz, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Tz::from_str(&s).map_err(serde::de::Error::custom)
}

/// Schedule defines when the dispatcher fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    Cron {
        expression: String,
        #[serde(serialize_with = "serialize_tz", deserialize_with = "deserialize_tz")]
        timezone: Tz,
    },
    FixedRate {
        interval_seconds: u32,
    },
}

impl Schedule {
    /// Calculate the next firing time based on the last firing time
    ///
    /// Cron schedules return the next occurrence strictly after the reference
    /// instant (the last firing, or now for the first). Fixed-rate schedules
    /// fire immediately the first time, then at the configured interval.
    pub fn next_execution_time(
        &self,
        last_execution: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            Schedule::Cron {
                expression,
                timezone,
            } => calculate_cron_next_execution(expression, *timezone, last_execution),

            Schedule::FixedRate { interval_seconds } => match last_execution {
                Some(last) => Ok(last + Duration::seconds(*interval_seconds as i64)),
                None => Ok(Utc::now()),
            },
        }
    }

    /// Validate the schedule configuration without computing a firing time
    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            Schedule::Cron { expression, .. } => {
                parse_cron_expression(expression)?;
                Ok(())
            }
            Schedule::FixedRate { interval_seconds } => {
                if *interval_seconds == 0 {
                    return Err(ScheduleError::InvalidConfiguration(
                        "interval_seconds must be greater than 0".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Parse and validate a cron expression
pub fn parse_cron_expression(expression: &str) -> Result<CronSchedule, ScheduleError> {
    CronSchedule::from_str(expression).map_err(|e| ScheduleError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// Calculate the next firing time for cron schedules
fn calculate_cron_next_execution(
    expression: &str,
    timezone: Tz,
    last_execution: Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let schedule = parse_cron_expression(expression)?;

    let reference_time = last_execution.unwrap_or_else(Utc::now);
    let reference_in_tz = reference_time.with_timezone(&timezone);

    let next_in_tz =
        schedule
            .after(&reference_in_tz)
            .next()
            .ok_or_else(|| ScheduleError::NoNextExecution {
                schedule_type: "cron".to_string(),
            })?;

    Ok(next_in_tz.with_timezone(&Utc))
}

/// Default timezone for cron evaluation, matching the target deployment
pub fn default_timezone() -> Tz {
    chrono_tz::Asia::Tokyo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_cron_expression() {
        let result = parse_cron_expression("0 0 * * * *");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_invalid_cron_expression() {
        let result = parse_cron_expression("invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_timezone() {
        let tz = default_timezone();
        assert_eq!(tz.to_string(), "Asia/Tokyo");
    }

    #[test]
    fn test_cron_next_is_strictly_after_reference() {
        let schedule = Schedule::Cron {
            expression: "0 0 * * * *".to_string(),
            timezone: default_timezone(),
        };
        let reference = Utc::now();
        let next = schedule.next_execution_time(Some(reference)).unwrap();
        assert!(next > reference);
        // Hourly schedule: the next firing is at most one hour away
        assert!(next - reference <= Duration::hours(1));
    }

    #[test]
    fn test_cron_first_firing_is_in_the_future() {
        let schedule = Schedule::Cron {
            expression: "0 0 * * * *".to_string(),
            timezone: default_timezone(),
        };
        let before = Utc::now();
        let next = schedule.next_execution_time(None).unwrap();
        assert!(next > before);
    }

    #[test]
    fn test_fixed_rate_first_execution_is_immediate() {
        let schedule = Schedule::FixedRate {
            interval_seconds: 60,
        };
        let before = Utc::now();
        let next = schedule.next_execution_time(None).unwrap();
        assert!((next - before).num_seconds().abs() < 1);
    }

    #[test]
    fn test_fixed_rate_subsequent_execution() {
        let schedule = Schedule::FixedRate {
            interval_seconds: 60,
        };
        let last = Utc::now();
        let next = schedule.next_execution_time(Some(last)).unwrap();
        assert_eq!(next, last + Duration::seconds(60));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let schedule = Schedule::FixedRate {
            interval_seconds: 0,
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_expression() {
        let schedule = Schedule::Cron {
            expression: "not a cron".to_string(),
            timezone: default_timezone(),
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_schedule_serde_round_trip() {
        let schedule = Schedule::Cron {
            expression: "0 0 * * * *".to_string(),
            timezone: default_timezone(),
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["type"], "cron");
        assert_eq!(json["timezone"], "Asia/Tokyo");
        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, schedule);
    }
}
