use anyhow::{anyhow, bail, Result};
use opencv::{core, prelude::*, videoio};
use std::path::Path;

use super::{FrameSink, VideoProps};

/// Frame sink backed by an OpenCV `VideoWriter`.
pub struct VideoSink {
    writer: videoio::VideoWriter,
}

impl VideoSink {
    /// Opens `path` for writing with the source's frame rate and
    /// resolution. The codec tag is an explicit argument so callers can
    /// substitute encodings without touching the frame loop.
    pub fn create(path: &Path, props: &VideoProps, codec: &str) -> Result<Self> {
        let tag = fourcc(codec)?;
        let size = core::Size::new(props.width as i32, props.height as i32);

        let writer =
            videoio::VideoWriter::new(path.to_string_lossy().as_ref(), tag, props.fps, size, true)?;

        if !writer.is_opened()? {
            crate::utils::logger::error(&format!(
                "failed to create output video: {} (codec {})",
                path.display(),
                codec
            ));
            return Err(anyhow!(
                "could not create output video: {}",
                path.display()
            ));
        }

        crate::utils::logger::debug(&format!(
            "writing {}: {}x{} @ {:.3} fps, codec {}",
            path.display(),
            props.width,
            props.height,
            props.fps,
            codec
        ));

        Ok(Self { writer })
    }
}

impl FrameSink for VideoSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.release()?;
        Ok(())
    }
}

fn fourcc(codec: &str) -> Result<i32> {
    let chars: Vec<char> = codec.chars().collect();
    if chars.len() != 4 {
        bail!("codec tag must be exactly four characters, got '{}'", codec);
    }
    Ok(videoio::VideoWriter::fourcc(
        chars[0], chars[1], chars[2], chars[3],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_rejects_wrong_length_tags() {
        assert!(fourcc("").is_err());
        assert!(fourcc("mp4").is_err());
        assert!(fourcc("mp4v!").is_err());
    }

    #[test]
    fn fourcc_packs_four_characters() {
        let tag = fourcc("mp4v").unwrap();
        let expected = ('m' as i32)
            | (('p' as i32) << 8)
            | (('4' as i32) << 16)
            | (('v' as i32) << 24);
        assert_eq!(tag, expected);
    }
}
