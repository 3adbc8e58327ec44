use std::{ffi::OsStr, path::Path};

use miette::miette;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::command::{assert_success_command, run_command, stderr_text, Capture, YT_DL, YT_DLP};
use crate::{
    result::{Error, Result},
    types::MediaSource,
};

/// Interface for fetching a remote stream onto the local disk
pub trait StreamDownloader {
    /// Download the best available audio stream of `url` into `dest_dir`.
    ///
    /// On success, yields the local file along with the video identifier
    /// and, when the platform reports it, the total stream duration.
    fn fetch(&self, url: &Url, dest_dir: &Path) -> Result<MediaSource>;
}

/// Interface for the [yt-dlp](https://github.com/yt-dlp/yt-dlp) program,
/// falling back to `youtube-dl`
pub struct Ytdl {
    program: &'static str,
}

impl Ytdl {
    /// Verify that the `yt-dlp` or `youtube-dl` binary is reachable
    pub fn new() -> Result<Self> {
        for program in [YT_DLP, YT_DL] {
            let probe = assert_success_command(
                program,
                |cmd| cmd.arg("--version"),
                |stderr| Error::Miette(miette!("{program} --version failed: {stderr}")),
            );
            if probe.is_ok() {
                return Ok(Self { program });
            }
        }
        Err(Error::Miette(miette!(
            "Neither yt-dlp nor youtube-dl was found in PATH"
        )))
    }

    /// Query the video identifier and duration without downloading anything
    fn metadata(&self, url: &Url) -> Result<(String, Option<f64>)> {
        let res = run_command(
            self.program,
            |cmd| {
                cmd.arg("-q")
                    .arg("--no-warnings")
                    .arg("--skip-download")
                    .arg("-j")
                    .arg("--")
                    .arg(url.as_str())
            },
            Capture::STDOUT | Capture::STDERR,
        )?;

        if !res.status.success() {
            return Err(Error::DownloadFailed(stderr_text(&res)));
        }

        let stdout = String::from_utf8_lossy(&res.stdout);
        let json: Value = serde_json::from_str(&stdout)
            .map_err(|err| Error::Miette(miette!("Could not parse downloader metadata: {err}")))?;

        let video_id = json
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("video")
            .to_owned();
        let duration = json.get("duration").and_then(Value::as_f64);

        Ok((video_id, duration))
    }
}

impl StreamDownloader for Ytdl {
    fn fetch(&self, url: &Url, dest_dir: &Path) -> Result<MediaSource> {
        debug!("Requesting metadata of {url}");
        let (video_id, duration) = self.metadata(url)?;

        info!("Downloading the audio stream of '{video_id}'");

        // The mkv suffix keeps the container format open so the stream data
        // can be written as-is no matter what audio codec the platform served
        let file = tempfile::Builder::new()
            .suffix(".mkv")
            .tempfile_in(dest_dir)?;

        let res = run_command(
            self.program,
            |cmd| {
                cmd.arg("-q")
                    .arg("--no-warnings")
                    .args([OsStr::new("-o"), file.path().as_os_str()])
                    .arg("--no-continue") // or else fails when the file already exists, even an empty one
                    .args(["-f", "bestaudio/best"])
                    .arg("--")
                    .arg(url.as_str())
            },
            Capture::STDERR,
        )?;

        if !res.status.success() {
            return Err(Error::DownloadFailed(stderr_text(&res)));
        }

        debug!("Downloaded to {}", file.path().display());
        Ok(MediaSource {
            file,
            video_id,
            duration,
        })
    }
}
