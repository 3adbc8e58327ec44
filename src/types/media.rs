use tempfile::NamedTempFile;

/// A successfully fetched stream, owned for the lifetime of one invocation.
///
/// The tempfile handle owns the downloaded data: dropping it deletes the
/// file, which is what guarantees that no intermediate artifact survives
/// the run.
#[derive(Debug)]
pub struct MediaSource {
    pub file: NamedTempFile,
    pub video_id: String,
    /// Total stream duration in seconds, when the platform reports it
    pub duration: Option<f64>,
}
