use inkstreak_domain::shared::{DomainError, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// Structured error printed by the CLI on failure
///
/// Carries the numeric code for scripting, the message, a severity and
/// whether retrying the same command may succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    /// Numeric error code (2xxx-6xxx range)
    pub code: u16,

    pub message: String,

    pub severity: ErrorSeverity,

    /// Whether the operation can be retried
    pub recoverable: bool,
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code().code(),
            message: err.to_string(),
            severity: err.severity(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_from_domain_error() {
        let cmd_err: CommandError = DomainError::UserNotFound("ghost".to_string()).into();

        assert_eq!(cmd_err.code, 2001);
        assert_eq!(cmd_err.message, "User not found: ghost");
        assert_eq!(cmd_err.severity, ErrorSeverity::Info);
        assert!(!cmd_err.recoverable);
    }

    #[test]
    fn test_conflict_is_reported_as_recoverable() {
        let cmd_err: CommandError = DomainError::Conflict("stale".to_string()).into();

        assert_eq!(cmd_err.code, 4002);
        assert!(cmd_err.recoverable);
        assert_eq!(cmd_err.to_string(), "[4002] Concurrent modification: stale");
    }

    #[test]
    fn test_command_error_serializes_for_stderr() {
        let cmd_err: CommandError = DomainError::Infrastructure("disk full".to_string()).into();

        let json = serde_json::to_value(&cmd_err).unwrap();
        assert_eq!(json["code"], 5001);
        assert_eq!(json["message"], "Infrastructure error: disk full");
        assert_eq!(json["severity"], "Error");
        assert_eq!(json["recoverable"], false);
    }
}
