use anyhow::{bail, Result};
use opencv::{core::Size, imgproc, prelude::*};

/// Downscale then upscale a frame to produce hard-edged pixel blocks.
///
/// The bilinear pass averages fine detail away; blowing the reduced
/// image back up with nearest-neighbor replicates each low-res pixel
/// into a block instead of smearing it, which is what makes the output
/// look pixelated rather than blurred. The `max(1, ...)` clamp keeps
/// the intermediate image from collapsing to zero size when the level
/// exceeds a frame dimension.
pub fn pixelate_frame(frame: &Mat, level: u32) -> Result<Mat> {
    if level == 0 {
        bail!("pixelation level must be at least 1");
    }

    let width = frame.cols();
    let height = frame.rows();
    let temp_w = (width / level as i32).max(1);
    let temp_h = (height / level as i32).max(1);

    let mut reduced = Mat::default();
    imgproc::resize(
        frame,
        &mut reduced,
        Size::new(temp_w, temp_h),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut pixelated = Mat::default();
    imgproc::resize(
        &reduced,
        &mut pixelated,
        Size::new(width, height),
        0.0,
        0.0,
        imgproc::INTER_NEAREST,
    )?;

    Ok(pixelated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Mat, Scalar, Vec3b, CV_8UC3};
    use opencv::prelude::*;

    fn solid(width: i32, height: i32, value: f64) -> Mat {
        Mat::new_rows_cols_with_default(
            height,
            width,
            CV_8UC3,
            Scalar::new(value, value, value, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn keeps_dimensions_for_any_level() {
        let frame = solid(64, 48, 128.0);
        for level in [1, 2, 7, 48, 500] {
            let out = pixelate_frame(&frame, level).unwrap();
            assert_eq!(out.cols(), 64);
            assert_eq!(out.rows(), 48);
            assert_eq!(out.channels(), 3);
        }
    }

    #[test]
    fn level_one_is_an_identity_resample() {
        let frame = solid(16, 12, 200.0);
        let out = pixelate_frame(&frame, 1).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                assert_eq!(
                    *out.at_2d::<Vec3b>(y, x).unwrap(),
                    Vec3b::from([200, 200, 200])
                );
            }
        }
    }

    #[test]
    fn oversized_level_collapses_to_a_single_color() {
        // 3x3 with level 10: the intermediate clamps to 1x1, so every
        // output pixel carries the same averaged color
        let mut frame = solid(3, 3, 0.0);
        *frame.at_2d_mut::<Vec3b>(0, 0).unwrap() = Vec3b::from([255, 90, 30]);
        *frame.at_2d_mut::<Vec3b>(2, 2).unwrap() = Vec3b::from([10, 200, 120]);

        let out = pixelate_frame(&frame, 10).unwrap();
        let first = *out.at_2d::<Vec3b>(0, 0).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(*out.at_2d::<Vec3b>(y, x).unwrap(), first);
            }
        }
    }

    #[test]
    fn rejects_level_zero() {
        let frame = solid(4, 4, 10.0);
        assert!(pixelate_frame(&frame, 0).is_err());
    }

    #[test]
    fn level_two_averages_column_pairs_into_bands() {
        // columns 10,20,30,40 -> bilinear halving averages pairs to
        // 15 and 35, nearest-neighbor then spreads each over two columns
        let mut frame = solid(4, 4, 0.0);
        for y in 0..4 {
            for x in 0..4 {
                let v = (10 * (x + 1)) as u8;
                *frame.at_2d_mut::<Vec3b>(y, x).unwrap() = Vec3b::from([v, v, v]);
            }
        }

        let out = pixelate_frame(&frame, 2).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let expected: i32 = if x < 2 { 15 } else { 35 };
                let got = out.at_2d::<Vec3b>(y, x).unwrap()[0] as i32;
                assert!(
                    (got - expected).abs() <= 1,
                    "pixel ({}, {}) = {}, expected ~{}",
                    x,
                    y,
                    got,
                    expected
                );
            }
        }
    }
}
