use anyhow::{anyhow, Result};
use opencv::{prelude::*, videoio};
use std::path::Path;

use super::{FrameSource, VideoProps};

/// Frame source backed by an OpenCV `VideoCapture`.
pub struct VideoSource {
    capture: videoio::VideoCapture,
    props: VideoProps,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy();

        // CAP_ANY lets OpenCV pick the platform backend
        // (AVFoundation / Media Foundation / V4L2-GStreamer)
        let capture = videoio::VideoCapture::from_file(path_str.as_ref(), videoio::CAP_ANY)?;

        if !capture.is_opened()? {
            crate::utils::logger::error(&format!("failed to open video: {}", path.display()));
            return Err(anyhow!("could not open video file: {}", path.display()));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;

        crate::utils::logger::debug(&format!(
            "opened {}: {}x{} @ {:.3} fps, header claims {} frames",
            path.display(),
            width,
            height,
            fps,
            frame_count
        ));

        Ok(Self {
            capture,
            props: VideoProps {
                width,
                height,
                fps,
                frame_count,
            },
        })
    }

    pub fn release(&mut self) -> Result<()> {
        self.capture.release()?;
        Ok(())
    }
}

impl FrameSource for VideoSource {
    fn props(&self) -> VideoProps {
        self.props
    }

    fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? {
            return Ok(None); // EOF
        }
        if frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}
