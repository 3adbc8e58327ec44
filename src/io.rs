use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use tracing::debug;

use crate::{
    result::Result,
    types::{AudioFormat, Timecode},
};

/// Build the descriptive filename used when the output is a directory:
/// `<id>_<floor(start)>-<floor(end)>.<ext>`.
///
/// Deterministic, so rerunning the same request overwrites its previous
/// artifact instead of accumulating copies.
pub fn derive_filename(
    video_id: &str,
    start: Timecode,
    end: Timecode,
    format: AudioFormat,
) -> String {
    static SAFE_ID_RE: OnceLock<Regex> = OnceLock::new();
    let re = SAFE_ID_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

    let safe_id = re.replace_all(video_id, "_");
    format!(
        "{safe_id}_{}-{}.{}",
        start.floor_secs(),
        end.floor_secs(),
        format.extension()
    )
}

/// Resolve the final destination of the produced clip.
///
/// An existing directory, or a path without an extension, receives a derived
/// filename. Anything else is taken verbatim. Missing parent directories are
/// created either way.
pub fn resolve_output_target(
    output: &Path,
    video_id: &str,
    start: Timecode,
    end: Timecode,
    format: AudioFormat,
) -> Result<PathBuf> {
    let target = if output.is_dir() || output.extension().is_none() {
        output.join(derive_filename(video_id, start, end, format))
    } else {
        output.to_path_buf()
    };

    match target.parent() {
        // A bare filename has an empty parent, which is not creatable
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
        _ => {}
    }

    Ok(target)
}

/// Platform downloads directory, the default output location
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Move a finished file into place, overwriting any previous artifact.
///
/// Falls back to a copy when the rename crosses filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        debug!("Moving the file failed, falling back to copying");
        fs::copy(from, to)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timecode(s: &str) -> Timecode {
        s.parse().unwrap()
    }

    #[test]
    fn derived_filename_truncates_seconds() {
        let name = derive_filename("dQw4w9WgXcQ", timecode("01:23"), timecode("01:53.9"), AudioFormat::Mp3);
        assert_eq!(name, "dQw4w9WgXcQ_83-113.mp3");
    }

    #[test]
    fn derived_filename_is_deterministic() {
        let a = derive_filename("abc", timecode("0"), timecode("90"), AudioFormat::Wav);
        let b = derive_filename("abc", timecode("0"), timecode("90"), AudioFormat::Wav);
        assert_eq!(a, b);
    }

    #[test]
    fn derived_filename_sanitizes_the_id() {
        let name = derive_filename("a/b c:d", timecode("0"), timecode("1"), AudioFormat::Aiff);
        assert_eq!(name, "a_b_c_d_0-1.aiff");
    }

    #[test]
    fn a_directory_output_receives_a_derived_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve_output_target(
            dir.path(),
            "abc",
            timecode("0"),
            timecode("120"),
            AudioFormat::Mp3,
        )
        .unwrap();
        assert_eq!(target, dir.path().join("abc_0-120.mp3"));
    }

    #[test]
    fn a_file_output_is_used_verbatim_and_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("nested/deeper/clip.mp3");

        let target = resolve_output_target(
            &wanted,
            "abc",
            timecode("0"),
            timecode("1"),
            AudioFormat::Mp3,
        )
        .unwrap();

        assert_eq!(target, wanted);
        assert!(wanted.parent().unwrap().is_dir());
    }

    #[test]
    fn an_extensionless_path_is_treated_as_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let wanted = dir.path().join("music");

        let target = resolve_output_target(
            &wanted,
            "abc",
            timecode("10"),
            timecode("20"),
            AudioFormat::Wav,
        )
        .unwrap();

        assert_eq!(target, wanted.join("abc_10-20.wav"));
        assert!(wanted.is_dir());
    }

    #[test]
    fn move_file_overwrites_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("new");
        let to = dir.path().join("old");
        fs::write(&from, b"new contents").unwrap();
        fs::write(&to, b"old contents").unwrap();

        move_file(&from, &to).unwrap();

        assert_eq!(fs::read(&to).unwrap(), b"new contents");
    }
}
