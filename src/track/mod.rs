mod sample;
mod track;

pub use sample::SampleInfo;
pub use track::{Track, TrackKind, TrackReference, VideoCodec};
