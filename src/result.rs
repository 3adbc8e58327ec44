use std::fmt::Display;

use miette::miette;

use crate::types::Timecode;

/// Errors that terminate the current invocation.
///
/// The first three variants are validation errors and are raised before any
/// network or subprocess call. `DownloadFailed` and `TranscodeFailed` carry
/// the diagnostic text of the external program verbatim.
#[derive(Debug)]
pub enum Error {
    /// The time string did not match one of the accepted shapes,
    /// or a component was out of range.
    InvalidTimeFormat(String),

    /// Both clip bounds were given but the end does not come after the start.
    InvalidTimeRange { start: Timecode, end: Timecode },

    /// The requested output format is not supported.
    UnsupportedFormat(String),

    /// The downloader could not produce a local media file.
    DownloadFailed(String),

    /// The transcoder could not cut or convert the stream.
    TranscodeFailed(String),

    /// The output location could not be created or written.
    Filesystem(std::io::Error),

    Miette(miette::Report),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTimeFormat(input) => write!(
                f,
                "Invalid time format '{input}': expected SS, MM:SS or HH:MM:SS, \
                 with an optional fractional part on the seconds"
            ),
            Error::InvalidTimeRange { start, end } => write!(
                f,
                "Invalid time range: end ({end}) must be greater than start ({start})"
            ),
            Error::UnsupportedFormat(format) => write!(
                f,
                "Unsupported output format '{format}': expected mp3, wav or aiff"
            ),
            Error::DownloadFailed(msg) => write!(f, "Download failed: {msg}"),
            Error::TranscodeFailed(msg) => write!(f, "Transcoding failed: {msg}"),
            Error::Filesystem(err) => write!(f, "Filesystem error: {err}"),
            Error::Miette(report) => report.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Filesystem(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Filesystem(err)
    }
}

impl From<miette::Report> for Error {
    fn from(report: miette::Report) -> Self {
        Error::Miette(report)
    }
}

impl From<Error> for miette::Report {
    fn from(err: Error) -> Self {
        match err {
            Error::Miette(report) => report,
            err => miette!("{err}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
