use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::shared::frame::Frame;

/// Where a scaled frame lands inside the display box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Computes the largest aspect-preserving size of `src` that fits the
/// box, centered. The scaled size never exceeds the box in either
/// dimension; the shorter axis gets equal margins on both sides (give
/// or take a rounding pixel).
pub fn fit(src_width: u32, src_height: u32, box_width: u32, box_height: u32) -> Placement {
    if src_width == 0 || src_height == 0 || box_width == 0 || box_height == 0 {
        return Placement {
            width: 0,
            height: 0,
            x: box_width / 2,
            y: box_height / 2,
        };
    }

    let scale = (box_width as f64 / src_width as f64).min(box_height as f64 / src_height as f64);
    let width = ((src_width as f64 * scale).round() as u32).clamp(1, box_width);
    let height = ((src_height as f64 * scale).round() as u32).clamp(1, box_height);

    Placement {
        width,
        height,
        x: (box_width - width) / 2,
        y: (box_height - height) / 2,
    }
}

/// Rescales a frame into a `box_width` x `box_height` surface,
/// letterboxed on black margins.
pub fn render(frame: &Frame, box_width: u32, box_height: u32) -> Frame {
    let placement = fit(frame.width(), frame.height(), box_width, box_height);
    let mut canvas = RgbImage::new(box_width, box_height);

    if placement.width > 0 && placement.height > 0 {
        let src = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .expect("Frame data length must match dimensions");
        let scaled = if placement.width == frame.width() && placement.height == frame.height() {
            src
        } else {
            imageops::resize(&src, placement.width, placement.height, FilterType::Triangle)
        };
        imageops::replace(&mut canvas, &scaled, placement.x as i64, placement.y as i64);
    }

    Frame::new(canvas.into_raw(), box_width, box_height, frame.index())
}
