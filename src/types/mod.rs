mod format;
mod media;
mod request;
mod timecode;

pub use format::AudioFormat;
pub use media::MediaSource;
pub use request::ClipRequest;
pub use timecode::Timecode;
