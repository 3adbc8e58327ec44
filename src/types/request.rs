use std::path::PathBuf;

use miette::miette;
use url::Url;

use crate::{
    result::{Error, Result},
    types::{AudioFormat, Timecode},
};

/// A single validated clip request.
///
/// Built once from the CLI input, immutable afterwards, consumed by the
/// pipeline. The end bound stays optional here: when missing it is resolved
/// against the source duration once the stream has been fetched.
#[derive(Debug)]
pub struct ClipRequest {
    pub url: Url,
    pub start: Option<Timecode>,
    pub end: Option<Timecode>,
    pub format: AudioFormat,
    /// Final file path, or a directory in which to derive a filename
    pub output: PathBuf,
}

impl ClipRequest {
    pub fn new(
        url: &str,
        start: Option<Timecode>,
        end: Option<Timecode>,
        format: AudioFormat,
        output: PathBuf,
    ) -> Result<Self> {
        let url = Url::parse(url.trim())
            .map_err(|err| Error::Miette(miette!("Invalid source URL '{url}': {err}")))?;

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(Error::InvalidTimeRange { start, end });
            }
        }

        Ok(Self {
            url,
            start,
            end,
            format,
            output,
        })
    }

    /// Effective clip start, defaulting to the beginning of the stream
    pub fn start(&self) -> Timecode {
        self.start.unwrap_or(Timecode::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timecode(s: &str) -> Option<Timecode> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let req = ClipRequest::new(
            "https://www.youtube.com/watch?v=abc123",
            timecode("01:23"),
            timecode("01:53"),
            AudioFormat::Mp3,
            PathBuf::from("/tmp/out"),
        )
        .unwrap();

        assert_eq!(req.start().as_secs_f64(), 83.0);
        assert_eq!(req.url.host_str(), Some("www.youtube.com"));
    }

    #[test]
    fn start_defaults_to_zero() {
        let req = ClipRequest::new(
            "https://example.com/v/1",
            None,
            None,
            AudioFormat::Wav,
            PathBuf::from("."),
        )
        .unwrap();

        assert_eq!(req.start(), Timecode::ZERO);
        assert!(req.end.is_none());
    }

    #[test]
    fn rejects_an_inverted_or_empty_range() {
        for (start, end) in [("01:53", "01:23"), ("10", "10")] {
            let res = ClipRequest::new(
                "https://example.com/v/1",
                timecode(start),
                timecode(end),
                AudioFormat::Mp3,
                PathBuf::from("."),
            );
            assert!(
                matches!(res, Err(Error::InvalidTimeRange { .. })),
                "{start}..{end} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_a_malformed_url() {
        for url in ["", "   ", "not a url", "www.youtube.com/watch"] {
            assert!(
                ClipRequest::new(url, None, None, AudioFormat::Mp3, PathBuf::from(".")).is_err(),
                "'{url}' should be rejected"
            );
        }
    }
}
