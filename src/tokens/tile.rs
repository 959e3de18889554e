//! Tile scheme: resize, cut into fixed-size tiles, charge per tile plus a flat base.

use tracing::debug;

use super::resize::resized_image_size;
use super::Aggregate;
use crate::types::{ImageEstimate, ImageRecord, TileParams};
use crate::{Error, Result};

/// Tile grid of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tiles_wide: u32,
    pub tiles_high: u32,
}

impl TileGrid {
    pub fn count(&self) -> u64 {
        u64::from(self.tiles_wide) * u64::from(self.tiles_high)
    }
}

/// Any partial tile counts as a full one.
pub fn image_tile_count(tile_size: u32, width: u32, height: u32) -> TileGrid {
    TileGrid {
        tiles_wide: width.div_ceil(tile_size),
        tiles_high: height.div_ceil(tile_size),
    }
}

/// Estimate for a single image, excluding the per-request base tokens.
/// Returns `None` when the tile or token count does not fit in a `u64`.
pub fn estimate_image(params: &TileParams, image: &ImageRecord) -> Option<ImageEstimate> {
    let size = resized_image_size(
        params.max_image_dimension,
        params.image_min_size_length,
        image.width,
        image.height,
    );
    let grid = image_tile_count(params.tile_size_length, size.width, size.height);
    let total_tiles = grid.count().checked_mul(u64::from(image.multiplier))?;
    Some(ImageEstimate {
        resized_width: size.width,
        resized_height: size.height,
        tiles_wide: grid.tiles_wide,
        tiles_high: grid.tiles_high,
        total_tiles,
        tokens: total_tiles.checked_mul(params.tokens_per_tile)?,
    })
}

/// Annotate every image and total the tokens; `base_tokens` is added once.
pub(crate) fn aggregate(params: &TileParams, images: &[ImageRecord]) -> Result<Aggregate> {
    let mut total_tokens = params.base_tokens;
    let mut annotated = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let overflow = || Error::TokenOverflow { index };
        let estimate = estimate_image(params, image).ok_or_else(overflow)?;
        debug!(
            index,
            resized_width = estimate.resized_width,
            resized_height = estimate.resized_height,
            tiles_wide = estimate.tiles_wide,
            tiles_high = estimate.tiles_high,
            multiplier = image.multiplier,
            tokens = estimate.tokens,
            "tile estimate"
        );
        total_tokens = total_tokens
            .checked_add(estimate.tokens)
            .ok_or_else(overflow)?;
        annotated.push(image.annotated(estimate));
    }
    Ok(Aggregate {
        images: annotated,
        total_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_count_ceils() {
        assert_eq!(
            image_tile_count(512, 1536, 768),
            TileGrid {
                tiles_wide: 3,
                tiles_high: 2
            }
        );
        assert_eq!(image_tile_count(512, 513, 1).count(), 2);
        assert_eq!(image_tile_count(512, 512, 512).count(), 1);
    }

    #[test]
    fn test_single_small_image() {
        let params = TileParams::standard(170, 85);
        let agg = aggregate(&params, &[ImageRecord::new(512, 512)]).unwrap();
        assert_eq!(agg.total_tokens, 255);
        let est = agg.images[0].estimate.unwrap();
        assert_eq!((est.tiles_wide, est.tiles_high), (1, 1));
        assert_eq!(est.tokens, 170);
    }

    #[test]
    fn test_large_image_grid() {
        let params = TileParams::standard(170, 85);
        let est = estimate_image(&params, &ImageRecord::new(4000, 2000)).unwrap();
        assert_eq!((est.resized_width, est.resized_height), (1536, 768));
        assert_eq!((est.tiles_wide, est.tiles_high), (3, 2));
        assert_eq!(est.total_tiles, 6);
        assert_eq!(est.tokens, 1020);
    }

    #[test]
    fn test_multiplier_replicates_tiles_not_base() {
        let params = TileParams::standard(170, 85);
        let agg = aggregate(&params, &[ImageRecord::new(1024, 1024).with_multiplier(3)]).unwrap();
        // 768x768 -> 2x2 tiles, billed three times
        let est = agg.images[0].estimate.unwrap();
        assert_eq!(est.total_tiles, 12);
        assert_eq!(agg.total_tokens, 85 + 12 * 170);
    }

    #[test]
    fn test_empty_list_charges_base_only() {
        let params = TileParams::standard(170, 85);
        let agg = aggregate(&params, &[]).unwrap();
        assert!(agg.images.is_empty());
        assert_eq!(agg.total_tokens, 85);
    }

    #[test]
    fn test_published_reference_costs() {
        // 2048x4096 high detail: 1024x2048 -> 768x1536 -> 6 tiles -> 1105 tokens
        let params = TileParams::standard(170, 85);
        let agg = aggregate(&params, &[ImageRecord::new(2048, 4096)]).unwrap();
        assert_eq!(agg.total_tokens, 1105);
    }

    #[test]
    fn test_per_image_overflow_is_error() {
        // 768x768 -> 4 tiles, 1000 copies, 2^53 tokens each
        let params = TileParams::standard(1 << 53, 0);
        let image = ImageRecord::new(1024, 1024).with_multiplier(1000);
        assert!(estimate_image(&params, &image).is_none());
        assert!(matches!(
            aggregate(&params, &[image]),
            Err(Error::TokenOverflow { index: 0 })
        ));
    }

    #[test]
    fn test_running_total_overflow_names_image() {
        // each image is 1000 * 2^53; base plus two fit, the third does not
        let params = TileParams::standard(1 << 53, 1 << 53);
        let image = ImageRecord::new(512, 512).with_multiplier(1000);
        assert!(matches!(
            aggregate(&params, &[image.clone(), image.clone(), image]),
            Err(Error::TokenOverflow { index: 2 })
        ));
    }
}
