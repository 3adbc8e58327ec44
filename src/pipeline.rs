use std::path::PathBuf;

use miette::miette;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::{
    io::{move_file, resolve_output_target},
    outside::{StreamDownloader, StreamTransformer},
    result::{Error, Result},
    types::{ClipRequest, MediaSource, Timecode},
};

/// The whole clip pipeline: fetch the stream, cut and convert the requested
/// window, move the result into place.
///
/// The run is a straight line, fetch then trim/transcode then finalize.
/// Every intermediate artifact lives in a per-invocation temporary directory
/// whose drop removes it, on success and on every failure path alike. The
/// final destination only ever receives a fully transcoded file.
pub struct Pipeline<'a> {
    downloader: &'a dyn StreamDownloader,
    transformer: &'a dyn StreamTransformer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        downloader: &'a dyn StreamDownloader,
        transformer: &'a dyn StreamTransformer,
    ) -> Self {
        Self {
            downloader,
            transformer,
        }
    }

    /// Run the request to completion and return the final output path
    pub fn run(&self, request: &ClipRequest) -> Result<PathBuf> {
        let workdir = TempDir::new()?;

        info!("Fetching {}", request.url);
        let source = self.downloader.fetch(&request.url, workdir.path())?;

        let start = request.start();
        let (end, end_secs) = self.resolve_end(request, &source)?;

        // An explicit end is checked against the start at validation time,
        // but clamping may still produce an empty window
        if end_secs <= start {
            return Err(Error::InvalidTimeRange {
                start,
                end: end_secs,
            });
        }

        info!(
            "Clipping '{}' ({} - {})",
            source.video_id,
            start,
            end.map_or("END".to_owned(), |end| end.to_string())
        );

        let clip = tempfile::Builder::new()
            .suffix(&format!(".{}", request.format.extension()))
            .tempfile_in(workdir.path())?;
        self.transformer.trim_and_convert(
            source.file.path(),
            clip.path(),
            start,
            end,
            request.format,
        )?;

        let target =
            resolve_output_target(&request.output, &source.video_id, start, end_secs, request.format)?;
        move_file(clip.path(), &target)?;

        info!("Clip saved to {}", target.display());
        Ok(target)
    }

    /// Resolve the effective clip end.
    ///
    /// An explicit end is clamped to the source duration when the duration
    /// is known. A missing end becomes the source duration, probing the
    /// downloaded file when the platform metadata did not report one.
    ///
    /// Returns the bound handed to the transcoder (`None` meaning "to the
    /// end of the stream") together with the concrete end second used for
    /// filename derivation.
    fn resolve_end(
        &self,
        request: &ClipRequest,
        source: &MediaSource,
    ) -> Result<(Option<Timecode>, Timecode)> {
        let duration = match source.duration {
            Some(duration) => duration,
            None => {
                debug!("The platform metadata has no duration, probing the downloaded file");
                self.transformer.probe_duration(source.file.path())?
            }
        };
        let duration = Timecode::from_secs_f64(duration).ok_or_else(|| {
            Error::Miette(miette!("The source reported an invalid duration: {duration}"))
        })?;

        Ok(match request.end {
            Some(end) if end > duration => {
                debug!("The requested end {end} is past the stream end, clamping to {duration}");
                (Some(duration), duration)
            }
            Some(end) => (Some(end), end),
            // Without an explicit end, let the transcoder run to the end of
            // the stream instead of trusting the reported duration
            None => (None, duration),
        })
    }
}
