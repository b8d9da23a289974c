pub mod props;
pub mod sink;
pub mod source;

pub use props::VideoProps;
pub use sink::VideoSink;
pub use source::VideoSource;

use anyhow::Result;
use opencv::core::Mat;

/// Sequential frame-by-frame read access to a video container.
pub trait FrameSource {
    fn props(&self) -> VideoProps;
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Mat>>;
}

/// Sequential frame-by-frame write access to a video container.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()>;
    /// Flushes buffered output and finalizes the container.
    fn finish(&mut self) -> Result<()>;
}
