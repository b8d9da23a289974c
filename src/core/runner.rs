use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::pixelate::pixelate_frame;
use crate::shared::constants;
use crate::video::{FrameSink, FrameSource, VideoSink, VideoSource};

/// Outcome of a completed pixelation run.
pub struct RunSummary {
    pub frames_written: u64,
    pub output: PathBuf,
}

/// Pulls every frame out of `source`, pixelates it at `level`, and
/// pushes the result to `sink` in read order. Returns the number of
/// frames written.
pub fn run_frame_loop(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    level: u32,
) -> Result<u64> {
    let mut frames_written: u64 = 0;

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break, // EOF
            Err(err) => {
                // A failed read is indistinguishable from a truncated
                // stream at this point; keep what was already written.
                crate::utils::logger::error(&format!("frame read failed: {:#}", err));
                break;
            }
        };

        let pixelated = pixelate_frame(&frame, level)?;
        sink.write_frame(&pixelated)?;
        frames_written += 1;

        if frames_written % constants::PROGRESS_LOG_INTERVAL == 0 {
            crate::utils::logger::debug(&format!("{} frames processed", frames_written));
        }
    }

    Ok(frames_written)
}

/// Opens `input`, pixelates every frame at `level`, and writes the
/// result to `output` with the source's frame rate and resolution.
///
/// The source is opened first; if that fails no sink is created and the
/// output path is never touched.
pub fn pixelate_video(input: &Path, output: &Path, level: u32, codec: &str) -> Result<RunSummary> {
    let mut source = VideoSource::open(input)?;
    let props = source.props();

    let mut sink = VideoSink::create(output, &props, codec)
        .with_context(|| format!("cannot write output to {}", output.display()))?;

    println!("🎞️ Pixelating video... (level: {})", level);

    let frames_written = run_frame_loop(&mut source, &mut sink, level)?;

    sink.finish()?;
    source.release()?;

    crate::utils::logger::info(&format!(
        "pixelated {} -> {} ({} frames, level {})",
        input.display(),
        output.display(),
        frames_written,
        level
    ));

    Ok(RunSummary {
        frames_written,
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::VideoProps;
    use anyhow::anyhow;
    use opencv::core::{Mat, Scalar, Vec3b, CV_8UC3};
    use opencv::prelude::*;

    struct FakeSource {
        frames: Vec<Mat>,
        cursor: usize,
    }

    impl FakeSource {
        /// Frames carry their index in the first channel so order
        /// survives the (value-preserving) transform of solid colors.
        fn tagged(count: usize) -> Self {
            let frames = (0..count)
                .map(|i| {
                    Mat::new_rows_cols_with_default(
                        8,
                        8,
                        CV_8UC3,
                        Scalar::new(i as f64, 0.0, 0.0, 0.0),
                    )
                    .unwrap()
                })
                .collect();
            Self { frames, cursor: 0 }
        }
    }

    impl FrameSource for FakeSource {
        fn props(&self) -> VideoProps {
            VideoProps {
                width: 8,
                height: 8,
                fps: 30.0,
                frame_count: self.frames.len() as i64,
            }
        }

        fn next_frame(&mut self) -> Result<Option<Mat>> {
            let frame = self.frames.get(self.cursor).cloned();
            self.cursor += 1;
            Ok(frame)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        tags: Vec<u8>,
    }

    impl FrameSink for RecordingSink {
        fn write_frame(&mut self, frame: &Mat) -> Result<()> {
            self.tags.push(frame.at_2d::<Vec3b>(0, 0)?[0]);
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct FailingSource {
        yielded: usize,
    }

    impl FrameSource for FailingSource {
        fn props(&self) -> VideoProps {
            VideoProps {
                width: 4,
                height: 4,
                fps: 30.0,
                frame_count: -1,
            }
        }

        fn next_frame(&mut self) -> Result<Option<Mat>> {
            if self.yielded < 2 {
                self.yielded += 1;
                let frame =
                    Mat::new_rows_cols_with_default(4, 4, CV_8UC3, Scalar::all(9.0))?;
                Ok(Some(frame))
            } else {
                Err(anyhow!("decoder hiccup"))
            }
        }
    }

    #[test]
    fn writes_every_frame_in_read_order() {
        let mut source = FakeSource::tagged(5);
        let mut sink = RecordingSink::default();

        let written = run_frame_loop(&mut source, &mut sink, 1).unwrap();
        assert_eq!(written, 5);
        assert_eq!(sink.tags, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_source_writes_nothing() {
        let mut source = FakeSource::tagged(0);
        let mut sink = RecordingSink::default();

        let written = run_frame_loop(&mut source, &mut sink, 10).unwrap();
        assert_eq!(written, 0);
        assert!(sink.tags.is_empty());
    }

    #[test]
    fn strong_levels_preserve_count_and_order() {
        // solid frames survive any resample unchanged, so the tags
        // still identify each frame after a level-3 transform
        let mut source = FakeSource::tagged(7);
        let mut sink = RecordingSink::default();

        let written = run_frame_loop(&mut source, &mut sink, 3).unwrap();
        assert_eq!(written, 7);
        assert_eq!(sink.tags, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn mid_stream_read_failure_ends_the_stream() {
        let mut source = FailingSource { yielded: 0 };
        let mut sink = RecordingSink::default();

        let written = run_frame_loop(&mut source, &mut sink, 2).unwrap();
        assert_eq!(written, 2);
        assert_eq!(sink.tags.len(), 2);
    }

    #[test]
    fn unopenable_input_creates_no_output() {
        let tmp_dir = std::env::temp_dir().join("pixelizer_runner_test");
        std::fs::create_dir_all(&tmp_dir).unwrap();
        let input = tmp_dir.join("does_not_exist.mp4");
        let output = tmp_dir.join("out.mp4");
        let _ = std::fs::remove_file(&output);

        let result = pixelate_video(&input, &output, 5, constants::DEFAULT_CODEC);
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
