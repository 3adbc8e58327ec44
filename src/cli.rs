use std::path::PathBuf;

use clap::Parser;

use crate::types::{AudioFormat, Timecode};

macro_rules! arg_env {
    ($v:literal) => {
        concat!("WEBCLIP_", $v)
    };
}

/// Clip a time segment out of a web video and convert it to an audio file.
///
/// Wrapper around `yt-dlp` and `ffmpeg`: download, trim, and transcode
/// in one command.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// URL of the video to clip (anything the downloader understands)
    #[arg(short, long, env = arg_env!("URL"))]
    pub url: String,

    /// Clip start time as `SS`, `MM:SS` or `HH:MM:SS`, with an optional
    /// `.ms` suffix. Defaults to the start of the stream
    #[arg(short, long, env = arg_env!("START"))]
    pub start: Option<Timecode>,

    /// Clip end time, same forms as --start.
    /// Defaults to the end of the stream
    #[arg(short, long, env = arg_env!("END"))]
    pub end: Option<Timecode>,

    /// Output audio format
    #[arg(short, long, value_enum, default_value_t = AudioFormat::Mp3, env = arg_env!("FORMAT"))]
    pub format: AudioFormat,

    /// Output file, or directory in which a descriptive filename is derived.
    /// Defaults to the platform downloads directory
    #[arg(short, long, env = arg_env!("OUTPUT"))]
    pub output: Option<PathBuf>,

    /// Log debug information
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_command_line() {
        let args = Args::parse_from([
            "webclip",
            "--url",
            "https://example.com/watch?v=abc",
            "--start",
            "01:23",
            "--end",
            "01:53",
            "--format",
            "wav",
            "--output",
            "/tmp/music",
        ]);

        assert_eq!(args.start.unwrap().as_secs_f64(), 83.0);
        assert_eq!(args.end.unwrap().as_secs_f64(), 113.0);
        assert_eq!(args.format, AudioFormat::Wav);
        assert_eq!(args.output.unwrap(), PathBuf::from("/tmp/music"));
    }

    #[test]
    fn format_defaults_to_mp3() {
        let args = Args::parse_from(["webclip", "-u", "https://example.com/v"]);
        assert_eq!(args.format, AudioFormat::Mp3);
        assert!(args.start.is_none());
        assert!(args.end.is_none());
    }

    #[test]
    fn rejects_an_unsupported_format() {
        let res = Args::try_parse_from(["webclip", "-u", "https://example.com/v", "-f", "flac"]);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_a_malformed_time() {
        let res = Args::try_parse_from(["webclip", "-u", "https://example.com/v", "-s", "1:75"]);
        assert!(res.is_err());
    }
}
