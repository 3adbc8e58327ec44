use std::{ffi::OsStr, fmt::Debug, path::Path};

use miette::miette;
use serde_json::Value;

use super::command::{
    assert_success_command, run_command, stderr_text, Capture, FFMPEG, FFPROBE, FFXXX_DEFAULT_ARGS,
};
use crate::{
    result::{Error, Result},
    types::{AudioFormat, Timecode},
};

/// Interface for cutting and converting a local media stream
pub trait StreamTransformer: Debug {
    /// Cut the window between `start` and `end` out of `input` and encode
    /// it as `format` into `output`.
    ///
    /// If `end` is not specified, the clip continues until the end of the
    /// stream.
    fn trim_and_convert(
        &self,
        input: &Path,
        output: &Path,
        start: Timecode,
        end: Option<Timecode>,
        format: AudioFormat,
    ) -> Result<()>;

    /// Total duration of a local media file, in seconds
    fn probe_duration(&self, input: &Path) -> Result<f64>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) and ffprobe programs
#[derive(Debug)]
pub struct Ffmpeg;

impl Ffmpeg {
    /// Verify that the `ffmpeg` binary is reachable
    pub fn new() -> Result<Self> {
        assert_success_command(
            FFMPEG,
            |cmd| cmd.arg("-version"),
            |stderr| Error::Miette(miette!("ffmpeg was found but is not usable: {stderr}")),
        )?;

        Ok(Self)
    }
}

impl StreamTransformer for Ffmpeg {
    fn trim_and_convert(
        &self,
        input: &Path,
        output: &Path,
        start: Timecode,
        end: Option<Timecode>,
        format: AudioFormat,
    ) -> Result<()> {
        // Seek before the input for a fast (keyframe) seek, then express the
        // end bound as a window length, which is what -t expects
        let window = end.map(|end| end.as_secs_f64() - start.as_secs_f64());

        assert_success_command(
            FFMPEG,
            |cmd| {
                let mut cmd = cmd
                    .args(FFXXX_DEFAULT_ARGS)
                    .arg("-y")
                    .args(["-ss", &start.to_string()]);

                if let Some(window) = window {
                    cmd = cmd.args(["-t", &format!("{window:.3}")]);
                }

                cmd.args([OsStr::new("-i"), input.as_os_str()])
                    .arg("-vn")
                    .args(["-acodec", format.codec()])
                    .args(format.encoder_args())
                    .arg(output)
            },
            Error::TranscodeFailed,
        )
    }

    fn probe_duration(&self, input: &Path) -> Result<f64> {
        let res = run_command(
            FFPROBE,
            |cmd| {
                cmd.args(FFXXX_DEFAULT_ARGS)
                    .arg(input.as_os_str())
                    .args(["-of", "json"])
                    .arg("-show_format")
            },
            Capture::STDOUT | Capture::STDERR,
        )?;

        if !res.status.success() {
            return Err(Error::TranscodeFailed(stderr_text(&res)));
        }

        let stdout = String::from_utf8_lossy(&res.stdout);
        let json: Value = serde_json::from_str(&stdout)
            .map_err(|err| Error::Miette(miette!("Could not parse the ffprobe output: {err}")))?;

        // ffprobe reports the duration as a string holding a float
        json.get("format")
            .and_then(|format| format.get("duration"))
            .and_then(Value::as_str)
            .and_then(|duration| duration.parse().ok())
            .ok_or_else(|| {
                Error::Miette(miette!(
                    "ffprobe did not report a duration for {}",
                    input.display()
                ))
            })
    }
}
