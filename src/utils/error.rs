use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("line {line}: expected {expected} columns, got {got}")]
    WidthMismatch {
        line: u64,
        expected: usize,
        got: usize,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The input was read and found inconsistent.
    High,
    /// The input could not be checked at all.
    Critical,
}

impl CheckError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CheckError::Parse { .. } | CheckError::WidthMismatch { .. } => ErrorSeverity::High,
            CheckError::Io { .. } | CheckError::Config { .. } => ErrorSeverity::Critical,
        }
    }

    /// Verdicts are the diagnostics printed on stdout; everything else goes to stderr.
    pub fn is_verdict(&self) -> bool {
        self.severity() == ErrorSeverity::High
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 2,
        }
    }

    /// Attaches a record number to an error raised by the csv reader.
    pub fn from_csv(line: u64, err: &csv::Error) -> Self {
        let message = match err.kind() {
            csv::ErrorKind::Utf8 { err, .. } => {
                format!("invalid UTF-8 in field {}", err.field())
            }
            csv::ErrorKind::Io(io_err) => io_err.to_string(),
            _ => err.to_string(),
        };
        CheckError::Parse { line, message }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
