/// A detected face rectangle in frame-pixel coordinates.
///
/// Produced fresh for every frame and discarded after drawing; nothing
/// links regions across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Classifier confidence for this window.
    pub score: f64,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32, score: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
        }
    }

    /// Intersection of this region with a `frame_width` x `frame_height`
    /// frame. Returns `None` when nothing of the region is visible.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_width as i32);
        let y2 = (self.y + self.height).min(frame_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            score: self.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_clamped_inside_frame_is_unchanged() {
        let r = Region::new(10, 20, 30, 40, 1.0);
        assert_eq!(r.clamped(640, 480), Some(r.clone()));
    }

    #[test]
    fn test_clamped_trims_negative_origin() {
        let r = Region::new(-10, -5, 30, 40, 1.0);
        let c = r.clamped(640, 480).unwrap();
        assert_eq!((c.x, c.y), (0, 0));
        assert_eq!((c.width, c.height), (20, 35));
    }

    #[test]
    fn test_clamped_trims_overhang() {
        let r = Region::new(620, 460, 40, 40, 1.0);
        let c = r.clamped(640, 480).unwrap();
        assert_eq!((c.width, c.height), (20, 20));
    }

    #[rstest]
    #[case::fully_left(Region::new(-50, 0, 40, 40, 0.5))]
    #[case::fully_below(Region::new(0, 480, 40, 40, 0.5))]
    #[case::zero_width(Region::new(10, 10, 0, 40, 0.5))]
    #[case::zero_height(Region::new(10, 10, 40, 0, 0.5))]
    fn test_clamped_invisible_is_none(#[case] r: Region) {
        assert_eq!(r.clamped(640, 480), None);
    }

    #[test]
    fn test_clamped_preserves_score() {
        let r = Region::new(-10, 0, 40, 40, 2.75);
        assert_eq!(r.clamped(640, 480).unwrap().score, 2.75);
    }
}
