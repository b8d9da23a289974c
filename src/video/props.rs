use serde::{Deserialize, Serialize};

/// Container-level properties of a video stream.
///
/// Read once when the source is opened and applied unchanged to the
/// sink, so the output keeps the input's resolution and frame rate.
/// `frame_count` is what the container header claims; some streams
/// report 0 or -1, so the processing loop never relies on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VideoProps {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: i64,
}
