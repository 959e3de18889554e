//! Patch scheme: count fixed-size patches, shrink to a patch budget when needed,
//! then scale the capped count by the model multiplier.

use tracing::debug;

use super::Aggregate;
use crate::types::{ImageEstimate, ImageRecord, PatchParams};
use crate::{Error, Result};

// 2^64; larger scaled counts do not fit a u64 token total.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Result of sizing one image under the patch scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchEstimate {
    pub patches_wide: u32,
    pub patches_high: u32,
    pub resized_width: u32,
    pub resized_height: u32,
    /// Capped patch count before the model multiplier.
    pub base_patches: u64,
    /// `ceil(base_patches * multiplier)`.
    pub tokens: u64,
}

/// Size an image against a patch budget.
///
/// Callers must pass positive dimensions; the shrink factor divides by the area.
/// Returns `None` when the scaled token count does not fit in a `u64`.
pub fn patch_tokens(
    width: u32,
    height: u32,
    patch_size: u32,
    max_patches: u64,
    multiplier: f64,
) -> Option<PatchEstimate> {
    let raw = u64::from(width.div_ceil(patch_size)) * u64::from(height.div_ceil(patch_size));

    let (final_width, final_height) = if raw > max_patches {
        shrink_to_budget(width, height, patch_size, max_patches)
    } else {
        (width, height)
    };

    let patches_wide = final_width.div_ceil(patch_size);
    let patches_high = final_height.div_ceil(patch_size);
    let base_patches = (u64::from(patches_wide) * u64::from(patches_high)).min(max_patches);

    let tokens = (base_patches as f64 * multiplier).ceil();
    if !(tokens < U64_LIMIT) {
        return None;
    }

    Some(PatchEstimate {
        patches_wide,
        patches_high,
        resized_width: final_width,
        resized_height: final_height,
        base_patches,
        tokens: tokens as u64,
    })
}

/// Scale so the area holds `max_patches` patches, then pull the factor down so
/// both sides land on whole patches. Truncates to whole pixels.
///
/// Only called when the raw count is over budget, which keeps the adjusted
/// factor below 1: a factor of 1 or more would need at least
/// `ceil(w/p) * ceil(h/p)` patches inside an area holding `max_patches`.
fn shrink_to_budget(width: u32, height: u32, patch_size: u32, max_patches: u64) -> (u32, u32) {
    let w = f64::from(width);
    let h = f64::from(height);
    let p = f64::from(patch_size);

    let mut r = (p * p * max_patches as f64 / (w * h)).sqrt();
    let width_patches = w * r / p;
    let height_patches = h * r / p;
    let width_factor = width_patches.floor() / width_patches;
    let height_factor = height_patches.floor() / height_patches;
    r *= width_factor.min(height_factor);

    ((w * r).floor() as u32, (h * r).floor() as u32)
}

/// Annotate every image and total the tokens.
///
/// Fails with [`Error::TokenOverflow`] naming the first image whose tokens do
/// not fit, either alone or added to the running total.
pub(crate) fn aggregate(params: &PatchParams, images: &[ImageRecord]) -> Result<Aggregate> {
    let mut total_tokens = 0u64;
    let mut annotated = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let overflow = || Error::TokenOverflow { index };
        let sized = patch_tokens(
            image.width,
            image.height,
            params.patch_size,
            params.max_patches,
            params.multiplier,
        )
        .ok_or_else(overflow)?;
        let repeat = u64::from(image.multiplier);
        let estimate = ImageEstimate {
            resized_width: sized.resized_width,
            resized_height: sized.resized_height,
            tiles_wide: sized.patches_wide,
            tiles_high: sized.patches_high,
            total_tiles: sized.base_patches.checked_mul(repeat).ok_or_else(overflow)?,
            tokens: sized.tokens.checked_mul(repeat).ok_or_else(overflow)?,
        };
        debug!(
            index,
            resized_width = estimate.resized_width,
            resized_height = estimate.resized_height,
            patches_wide = estimate.tiles_wide,
            patches_high = estimate.tiles_high,
            base_patches = sized.base_patches,
            multiplier = image.multiplier,
            tokens = estimate.tokens,
            "patch estimate"
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
