// Error handling framework

use thiserror::Error;

/// Schedule-related errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("Invalid schedule configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No next execution time available for {schedule_type} schedule")]
    NoNextExecution { schedule_type: String },
}

/// Workflow dispatch errors
///
/// A dispatch invocation produces exactly one outcome. Non-success responses
/// and transport-level failures travel the same failure path; neither is
/// retried or recovered locally.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Workflow dispatch failed with status {status}: {body}")]
    Failed { status: u16, body: String },

    #[error("Workflow dispatch request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DispatchError {
    /// Short label used for the failure metric
    pub fn reason(&self) -> String {
        match self {
            DispatchError::Failed { status, .. } => format!("status_{}", status),
            DispatchError::Transport(_) => "transport".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_error_display() {
        let err = ScheduleError::InvalidCronExpression {
            expression: "* * * *".to_string(),
            reason: "invalid format".to_string(),
        };
        assert!(err.to_string().contains("Invalid cron expression"));
    }

    #[test]
    fn test_dispatch_error_contains_status() {
        let err = DispatchError::Failed {
            status: 401,
            body: r#"{"message":"Bad credentials"}"#.to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn test_dispatch_error_reason_label() {
        let err = DispatchError::Failed {
            status: 502,
            body: String::new(),
        };
        assert_eq!(err.reason(), "status_502");
    }
}
