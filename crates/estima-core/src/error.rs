use std::fmt;

/// Machine-readable error codes surfaced alongside human messages so
/// scripted callers can branch without parsing prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    NoActiveWorkflow,
    NotAwaitingReview,
    UnknownStage,
    UnknownRole,
    DuplicateName,
    SessionParseError,
    SessionWriteFailed,
    ApiRequestFailed,
    Unauthorized,
    WorkflowGone,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::NoActiveWorkflow => "E2001",
            Self::NotAwaitingReview => "E2002",
            Self::UnknownStage => "E2003",
            Self::UnknownRole => "E2004",
            Self::DuplicateName => "E2005",
            Self::SessionParseError => "E3001",
            Self::SessionWriteFailed => "E3002",
            Self::ApiRequestFailed => "E4001",
            Self::Unauthorized => "E4002",
            Self::WorkflowGone => "E4003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::NoActiveWorkflow => "No active workflow in this session",
            Self::NotAwaitingReview => "Workflow is not awaiting review",
            Self::UnknownStage => "Unknown stage",
            Self::UnknownRole => "Unknown role",
            Self::DuplicateName => "Name is empty or already in use",
            Self::SessionParseError => "Session file parse error",
            Self::SessionWriteFailed => "Session file write failed",
            Self::ApiRequestFailed => "API request failed",
            Self::Unauthorized => "Not logged in or token rejected",
            Self::WorkflowGone => "Workflow no longer exists on the server",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `est init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .estima/config.toml and retry."),
            Self::NoActiveWorkflow => Some("Run `est start <file>` to launch a workflow."),
            Self::NotAwaitingReview => {
                Some("Run `est watch` until the workflow reaches the review gate.")
            }
            Self::UnknownStage => Some("Add the stage first with `est stage add <name>`."),
            Self::UnknownRole => Some("Add the role first with `est role add <name> --rate <n>`."),
            Self::DuplicateName => None,
            Self::SessionParseError => {
                Some("Delete .estima/session.json and start a fresh workflow.")
            }
            Self::SessionWriteFailed => Some("Check disk space and write permissions."),
            Self::ApiRequestFailed => Some("Check the server address and network, then retry."),
            Self::Unauthorized => Some("Run `est login` to refresh credentials."),
            Self::WorkflowGone => Some("The server forgot this workflow; start a new one."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::NoActiveWorkflow,
            ErrorCode::NotAwaitingReview,
            ErrorCode::UnknownStage,
            ErrorCode::UnknownRole,
            ErrorCode::DuplicateName,
            ErrorCode::SessionParseError,
            ErrorCode::SessionWriteFailed,
            ErrorCode::ApiRequestFailed,
            ErrorCode::Unauthorized,
            ErrorCode::WorkflowGone,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::WorkflowGone.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
