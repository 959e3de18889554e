//! Two-stage resize used by the tile scheme.

/// Resized image size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizedSize {
    pub width: u32,
    pub height: u32,
}

/// Fit the image inside `max_dimension` on both sides, then shrink it further so
/// the shorter side is at most `min_side`. Neither stage ever upscales.
///
/// Both stages work on unrounded values; rounding to whole pixels happens once
/// at the end.
pub fn resized_image_size(max_dimension: u32, min_side: u32, width: u32, height: u32) -> ResizedSize {
    let max_dimension = f64::from(max_dimension);
    let min_side = f64::from(min_side);
    let mut w = f64::from(width);
    let mut h = f64::from(height);

    if w > max_dimension || h > max_dimension {
        let scale = (max_dimension / w).min(max_dimension / h);
        w *= scale;
        h *= scale;
    }

    let shortest = w.min(h);
    if shortest > min_side {
        let scale = min_side / shortest;
        w *= scale;
        h *= scale;
    }

    ResizedSize {
        width: round_half_up(w),
        height: round_half_up(h),
    }
}

fn round_half_up(v: f64) -> u32 {
    (v + 0.5).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_bounds_unchanged() {
        assert_eq!(
            resized_image_size(2048, 768, 512, 512),
            ResizedSize {
                width: 512,
                height: 512
            }
        );
    }

    #[test]
    fn test_shrink_to_max_then_min_side() {
        assert_eq!(
            resized_image_size(2048, 768, 4000, 2000),
            ResizedSize {
                width: 1536,
                height: 768
            }
        );
    }

    #[test]
    fn test_only_min_side_stage() {
        // 1024x1024 fits the 2048 box but its short side exceeds 768.
        assert_eq!(
            resized_image_size(2048, 768, 1024, 1024),
            ResizedSize {
                width: 768,
                height: 768
            }
        );
    }

    #[test]
    fn test_only_max_stage() {
        // 4096x200 -> 2048x100; short side already below 768.
        assert_eq!(
            resized_image_size(2048, 768, 4096, 200),
            ResizedSize {
                width: 2048,
                height: 100
            }
        );
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 3000x1000 -> 2048x682.67 -> rounds to 683
        assert_eq!(
            resized_image_size(2048, 768, 3000, 1000),
            ResizedSize {
                width: 2048,
                height: 683
            }
        );
    }

    #[test]
    fn test_tiny_image_passes_through() {
        assert_eq!(
            resized_image_size(2048, 768, 1, 3),
            ResizedSize {
                width: 1,
                height: 3
            }
        );
    }
}
