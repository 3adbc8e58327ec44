use std::process::{Command, Output, Stdio};

use bitflags::bitflags;
use miette::miette;
use tracing::{debug, enabled, trace, Level};

use crate::result::{Error, Result};

pub const YT_DLP: &str = "yt-dlp";
pub const YT_DL: &str = "youtube-dl";
pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";
pub const FFXXX_DEFAULT_ARGS: [&str; 3] = ["-hide_banner", "-loglevel", "error"];

bitflags! {
    pub struct Capture: u8 {
        const STDIN = 0b0000001;
        const STDOUT = 0b0000010;
        const STDERR = 0b0000100;
    }
}

/// Run a program, returning its raw output handle.
///
/// IO handles are captured only if the caller asked for it or if the log
/// level is Debug, in which case their sizes are logged.
///
/// An error is returned only when the program could not be executed at all.
/// A run that exits with a non-zero status is not an error here, the caller
/// decides what that means.
pub fn run_command<F: FnOnce(&mut Command) -> &mut Command>(
    program: &str,
    f: F,
    capture: Capture,
) -> Result<Output> {
    let is_debug = enabled!(Level::DEBUG);
    let get_io = |capture| {
        if capture {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    };

    let mut cmd = Command::new(program);
    let cmd = f(&mut cmd)
        .stdin(get_io(capture.contains(Capture::STDIN)))
        .stdout(get_io(is_debug || capture.contains(Capture::STDOUT)))
        .stderr(get_io(is_debug || capture.contains(Capture::STDERR)));

    debug!("Executing command: {cmd:?}");
    let res = cmd
        .output()
        .map_err(|err| Error::Miette(miette!("Could not run the {program} command: {err}")))?;

    if is_debug {
        debug!("status: {}", res.status);
        debug!("stdout: {} bytes long", res.stdout.len());
        trace!("stdout: {:?}", String::from_utf8_lossy(&res.stdout));
        debug!("stderr: {} bytes long", res.stderr.len());
        trace!("stderr: {:?}", String::from_utf8_lossy(&res.stderr));
    }

    Ok(res)
}

/// Run the command and require a success status code.
///
/// On a non-zero status, the captured stderr is handed to `fail` so the
/// caller can build the matching domain error.
pub fn assert_success_command<F, E>(program: &str, f: F, fail: E) -> Result<()>
where
    F: FnOnce(&mut Command) -> &mut Command,
    E: FnOnce(String) -> Error,
{
    let res = run_command(program, f, Capture::STDERR)?;
    if res.status.success() {
        Ok(())
    } else {
        Err(fail(stderr_text(&res)))
    }
}

/// The captured stderr of a finished command, trimmed for display
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_owned()
}
