pub mod export;
pub mod input;
pub mod report;

use std::path::PathBuf;

/// Failures of the command line front end. The filter engine itself has no
/// error type.
#[derive(Debug)]
pub enum CliError {
    UnsupportedExtension(PathBuf),
    InvalidNow(String),
    RecordsNotArray(PathBuf),
    RecordNotObject { path: PathBuf, index: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::UnsupportedExtension(path) => {
                write!(
                    f,
                    "Unsupported filter set file: {}\n\nUse a .yaml, .yml or .json file.",
                    path.display()
                )
            }
            CliError::InvalidNow(value) => {
                write!(
                    f,
                    "Invalid --now value: '{}'\n\nUse an RFC 3339 timestamp such as 2024-06-30T12:00:00Z or a date such as 2024-06-30.",
                    value
                )
            }
            CliError::RecordsNotArray(path) => {
                write!(
                    f,
                    "Records file {} must contain a JSON array of objects",
                    path.display()
                )
            }
            CliError::RecordNotObject { path, index } => {
                write!(
                    f,
                    "Record #{} in {} is not a JSON object",
                    index,
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CliError {}
