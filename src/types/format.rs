use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;

use crate::result::{Error, Result};

/// The closed set of output audio formats.
///
/// Each maps to a fixed ffmpeg codec configuration, so an unsupported
/// format can never reach the transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Aiff,
}

impl AudioFormat {
    /// File extension, without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Aiff => "aiff",
        }
    }

    /// The ffmpeg audio codec encoding this format
    pub fn codec(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Wav => "pcm_s16le",
            AudioFormat::Aiff => "pcm_s16be",
        }
    }

    /// Extra encoder arguments: bitrate for mp3, channel layout and sample
    /// rate for the PCM formats
    pub fn encoder_args(self) -> &'static [&'static str] {
        match self {
            AudioFormat::Mp3 => &["-b:a", "192k"],
            AudioFormat::Wav | AudioFormat::Aiff => &["-ac", "2", "-ar", "44100"],
        }
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "wav" => Ok(AudioFormat::Wav),
            "aiff" => Ok(AudioFormat::Aiff),
            _ => Err(Error::UnsupportedFormat(s.to_owned())),
        }
    }
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
