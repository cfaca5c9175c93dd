use std::{fmt::Display, path::PathBuf};

use miette::{miette, Diagnostic};
use thiserror::Error;

use crate::types::ParseTimeError;

/// Longest stderr excerpt shown to the user in a notification
pub const STDERR_EXCERPT_LEN: usize = 200;

pub const USAGE: &str = "Usage: <url> <start> <end> or <url> full";

/// Reasons a query could not be turned into a request.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum InputError {
    #[error("No input given")]
    #[diagnostic(help("{}", USAGE))]
    NoInput,

    #[error("Expected 3 words (<url> <start> <end>) or 2 words (<url> full), got {0}")]
    #[diagnostic(help("{}", USAGE))]
    WrongTokenCount(usize),

    #[error("'{token}' is not a valid time")]
    #[diagnostic(help("Write times like 1h2m3s, 90s, 10m or 00:01:30"))]
    BadTime {
        token: String,
        #[source]
        source: ParseTimeError,
    },

    #[error("'{0}' is not a valid video URL")]
    #[diagnostic(help("The URL must start with http:// or https://"))]
    BadUrl(String),
}

impl InputError {
    /// Short title naming the kind of mistake
    pub fn title(&self) -> &'static str {
        match self {
            InputError::NoInput => "No input",
            InputError::WrongTokenCount(_) => "Wrong input",
            InputError::BadTime { .. } => "Bad time format",
            InputError::BadUrl(_) => "Bad URL format",
        }
    }
}

/// An external program ran but did not exit successfully.
#[derive(Debug, Error, Diagnostic)]
#[error("{program} did run but was not successful ({})", exit_code_text(.code))]
pub struct ProcessError {
    pub program: String,
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

impl ProcessError {
    /// The captured stderr, cut to [`STDERR_EXCERPT_LEN`] characters.
    pub fn stderr_excerpt(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.chars().count() <= STDERR_EXCERPT_LEN {
            stderr.to_owned()
        } else {
            let mut excerpt: String = stderr.chars().take(STDERR_EXCERPT_LEN).collect();
            excerpt.push_str("...");
            excerpt
        }
    }
}

fn exit_code_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "killed by a signal".to_owned(), |c| format!("exit code {c}"))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error("Could not prepare the output directory {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("{0}")]
    Unexpected(miette::Report),
}

impl From<miette::Report> for Error {
    fn from(err: miette::Report) -> Self {
        Error::Unexpected(err)
    }
}

impl Error {
    /// Add context to an unexpected error.
    /// The typed variants are left untouched as their message is already user-facing.
    pub fn wrap_err_with<D, F>(self, f: F) -> Error
    where
        D: Display + Send + Sync + 'static,
        F: FnOnce() -> D,
    {
        match self {
            Error::Unexpected(report) => Error::Unexpected(report.wrap_err(f())),
            err => err,
        }
    }

    /// Title and body of the notification reporting this failure
    pub fn notification(&self) -> (&'static str, String) {
        match self {
            Error::Input(err) => (err.title(), err.to_string()),
            Error::Filesystem { source, .. } => ("Error", format!("{self}: {source}")),
            Error::Process(err) => (
                "Error",
                format!("An error occurred while processing: {}", err.stderr_excerpt()),
            ),
            Error::Unexpected(report) => ("Critical error", format!("Unexpected error: {report}")),
        }
    }
}

pub fn err_msg<D: Display>(msg: D) -> Error {
    Error::Unexpected(miette!("{msg}"))
}

pub fn bail<T, D: Display>(msg: D) -> Result<T> {
    Err(err_msg(msg))
}

pub type Result<T> = std::result::Result<T, Error>;
