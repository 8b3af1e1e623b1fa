use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Outline color for detected faces (RGB green).
pub const BOX_COLOR: [u8; 3] = [0, 255, 0];

/// Outline thickness in pixels, drawn inward from the region edge.
pub const BOX_THICKNESS: i32 = 4;

/// Draws a rectangle outline for each region, in place.
///
/// Regions are clamped to the frame first; an empty slice leaves the
/// frame byte-for-byte untouched.
pub fn draw_regions(frame: &mut Frame, regions: &[Region]) {
    let (fw, fh) = (frame.width(), frame.height());
    for region in regions {
        let Some(r) = region.clamped(fw, fh) else {
            continue;
        };
        let t = BOX_THICKNESS.min(r.width).min(r.height);

        // Top and bottom bands span the full clamped width.
        fill(frame, r.x, r.y, r.width, t);
        fill(frame, r.x, r.y + r.height - t, r.width, t);
        // Side bands cover the rows between them.
        fill(frame, r.x, r.y + t, t, r.height - 2 * t);
        fill(frame, r.x + r.width - t, r.y + t, t, r.height - 2 * t);
    }
}

fn fill(frame: &mut Frame, x: i32, y: i32, width: i32, height: i32) {
    if width <= 0 || height <= 0 {
        return;
    }
    let mut pixels = frame.as_ndarray_mut();
    for row in y..y + height {
        for col in x..x + width {
            for (c, &value) in BOX_COLOR.iter().enumerate() {
                pixels[[row as usize, col as usize, c]] = value;
            }
        }
    }
}
