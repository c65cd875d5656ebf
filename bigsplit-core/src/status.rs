use serde::{Deserialize, Serialize};

/// Terminal status of one split run. Exactly one kind per result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitStatus {
    Success,
    Cancelled,
    IoError,
    UnauthorizedAccessError,
    PathTooLongError,
    DirectoryNotFoundError,
    NotSupportedError,
    UnknownError,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

impl SplitStatus {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Human-readable text for a status box or a terminal line.
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Split was successful!",
            Self::Cancelled => "Split canceled by user.",
            Self::IoError => "Split failed due to an input/output error.",
            Self::UnauthorizedAccessError => "Split failed due to an unauthorized access error.",
            Self::PathTooLongError => "Split failed due to a path too long error.",
            Self::DirectoryNotFoundError => "Split failed due to a directory not found error.",
            Self::NotSupportedError => "Split failed due to a not supported error.",
            Self::UnknownError => "Split failed due to an unknown error.",
        }
    }

    pub fn severity(self) -> Severity {
        if self.is_success() {
            Severity::Info
        } else {
            Severity::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_is_info() {
        let all = [
            SplitStatus::Success,
            SplitStatus::Cancelled,
            SplitStatus::IoError,
            SplitStatus::UnauthorizedAccessError,
            SplitStatus::PathTooLongError,
            SplitStatus::DirectoryNotFoundError,
            SplitStatus::NotSupportedError,
            SplitStatus::UnknownError,
        ];
        for s in all {
            let want = if s == SplitStatus::Success {
                Severity::Info
            } else {
                Severity::Error
            };
            assert_eq!(s.severity(), want, "{s:?}");
        }
        assert_eq!(SplitStatus::Cancelled.message(), "Split canceled by user.");
    }
}
