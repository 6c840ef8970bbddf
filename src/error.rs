//! Error taxonomy for a sales run.
//!
//! Every variant renders as the single line shown to the user. Detail that
//! should not reach the user (I/O errors, offending file names) lives in
//! fields left out of the message and is logged instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("{category} definition file does not exist")]
    FileNotFound { category: String },

    /// Structural problem: field count, line count or code pattern.
    #[error("{subject} has an invalid format")]
    InvalidFormat { subject: String },

    /// A record references a code missing from its master list.
    #[error("{file} has an invalid {category} code")]
    UnknownCode { file: String, category: String },

    #[error("sales files are not sequentially numbered")]
    NonSequentialFiles { previous: String, next: String },

    #[error("total amount exceeded 10 digits")]
    AmountOverflow { file: String },

    #[error("failed to write {file}")]
    WriteError { file: String, reason: String },

    #[error("an unexpected error occurred")]
    Unknown(String),
}

impl SalesError {
    pub fn invalid_definition(category: &str) -> Self {
        Self::InvalidFormat {
            subject: format!("{category} definition file"),
        }
    }

    pub fn invalid_record(file: impl Into<String>) -> Self {
        Self::InvalidFormat {
            subject: file.into(),
        }
    }

    pub fn unknown_code(file: impl Into<String>, category: impl Into<String>) -> Self {
        Self::UnknownCode {
            file: file.into(),
            category: category.into(),
        }
    }

    pub fn unknown(detail: impl ToString) -> Self {
        Self::Unknown(detail.to_string())
    }

    /// Process exit code for this kind of failure. Zero is reserved for success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Unknown(_) => 1,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::UnknownCode { .. } => 5,
            Self::NonSequentialFiles { .. } => 6,
            Self::AmountOverflow { .. } => 7,
            Self::WriteError { .. } => 8,
        }
    }
}

impl From<std::io::Error> for SalesError {
    fn from(err: std::io::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<anyhow::Error> for SalesError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unknown(format!("{err:#}"))
    }
}

pub type SalesResult<T> = Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_category_and_file() {
        assert_eq!(
            SalesError::FileNotFound {
                category: "branch".into()
            }
            .to_string(),
            "branch definition file does not exist"
        );
        assert_eq!(
            SalesError::invalid_definition("commodity").to_string(),
            "commodity definition file has an invalid format"
        );
        assert_eq!(
            SalesError::invalid_record("00000004.rcd").to_string(),
            "00000004.rcd has an invalid format"
        );
        assert_eq!(
            SalesError::unknown_code("00000002.rcd", "branch").to_string(),
            "00000002.rcd has an invalid branch code"
        );
        assert_eq!(
            SalesError::unknown_code("00000002.rcd", "commodity").to_string(),
            "00000002.rcd has an invalid commodity code"
        );
    }

    #[test]
    fn detail_stays_out_of_message() {
        let err = SalesError::unknown("permission denied (os error 13)");
        assert_eq!(err.to_string(), "an unexpected error occurred");

        let err = SalesError::WriteError {
            file: "branch.out".into(),
            reason: "disk full".into(),
        };
        assert_eq!(err.to_string(), "failed to write branch.out");
    }

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let errors = [
            SalesError::unknown("x"),
            SalesError::FileNotFound {
                category: "branch".into(),
            },
            SalesError::invalid_record("a"),
            SalesError::unknown_code("a", "branch"),
            SalesError::NonSequentialFiles {
                previous: "00000001.rcd".into(),
                next: "00000003.rcd".into(),
            },
            SalesError::AmountOverflow { file: "a".into() },
            SalesError::WriteError {
                file: "a".into(),
                reason: "b".into(),
            },
        ];
        let mut codes: Vec<u8> = errors.iter().map(SalesError::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn io_error_becomes_unknown() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: SalesError = io_err.into();
        assert!(matches!(err, SalesError::Unknown(_)));
    }
}
