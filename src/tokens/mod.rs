//! 图像 Token 计算模块：按模型计费规则计算图像输入的 Token 数与费用。
//!
//! # Image Token Calculation Module
//!
//! Computes how many input tokens a vision model charges for a list of images,
//! and what that costs, under one of two billing families:
//!
//! - **Tile scheme**: fit the image in a bounding box, shrink the short side,
//!   cut it into fixed-size tiles, charge per tile plus a flat base.
//! - **Patch scheme**: count fixed-size patches, shrink to a patch budget when
//!   over it, cap the count and scale it by a model multiplier.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`recalculate`] | Entry point: validates, dispatches on the scheme, prices the total |
//! | [`reset`] | Cleared aggregate totals |
//! | [`Calculation`] | Annotated images plus total tokens and cost |
//! | [`resized_image_size`] | Two-stage tile-scheme resize |
//! | [`image_tile_count`] | Ceil-divide a size into tiles |
//! | [`patch_tokens`] | Patch grid, budget shrink and capped tokens |
//! | [`FixedCost`] | Cost rounded to 5 decimals |
//!
//! ## Example
//!
//! ```rust
//! use vision_token_calc::tokens::recalculate;
//! use vision_token_calc::types::{ImageRecord, ModelConfig, TileParams};
//!
//! let model = ModelConfig::tile("gpt-4o", 2.5, TileParams::standard(170, 85));
//! let result = recalculate(&model, &[ImageRecord::new(512, 512)]).unwrap();
//! assert_eq!(result.total_tokens, 255);
//! assert_eq!(result.total_cost.to_string(), "0.00064");
//! ```
//!
//! Every call is a pure function of its inputs: the caller's records are not
//! touched, annotated copies come back in [`Calculation::images`].

mod patch;
mod pricing;
mod resize;
mod tile;

pub use patch::{patch_tokens, PatchEstimate};
pub use pricing::{token_cost, FixedCost, COST_DECIMALS, TOKENS_PER_MILLION};
pub use resize::{resized_image_size, ResizedSize};
pub use tile::{image_tile_count, TileGrid};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{BillingScheme, CalculationType, ImageRecord, ModelConfig};
use crate::Result;

/// Annotated images and summed tokens from one scheme aggregator.
#[derive(Debug, Clone)]
pub(crate) struct Aggregate {
    pub(crate) images: Vec<ImageRecord>,
    pub(crate) total_tokens: u64,
}

/// Output of [`recalculate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub model: String,
    pub calculation_type: CalculationType,
    pub images: Vec<ImageRecord>,
    pub total_tokens: u64,
    pub total_cost: FixedCost,
}

impl Calculation {
    pub fn totals(&self) -> CalculationTotals {
        CalculationTotals {
            total_tokens: Some(self.total_tokens),
            total_cost: Some(self.total_cost),
        }
    }
}

/// The two aggregate outputs; both `None` until a calculation runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationTotals {
    pub total_tokens: Option<u64>,
    pub total_cost: Option<FixedCost>,
}

impl CalculationTotals {
    pub fn is_empty(&self) -> bool {
        self.total_tokens.is_none() && self.total_cost.is_none()
    }
}

/// Compute per-image estimates and the priced total for `images` under `model`.
///
/// The model and every image are validated first; on error nothing is computed.
pub fn recalculate(model: &ModelConfig, images: &[ImageRecord]) -> Result<Calculation> {
    model.validate()?;
    for (index, image) in images.iter().enumerate() {
        image.validate(index)?;
    }

    let Aggregate {
        images,
        total_tokens,
    } = match &model.scheme {
        BillingScheme::Tile(params) => tile::aggregate(params, images)?,
        BillingScheme::Patch(params) => patch::aggregate(params, images)?,
    };
    let total_cost = token_cost(total_tokens, model.cost_per_million_tokens);

    info!(
        model = %model.name,
        scheme = model.calculation_type().as_str(),
        images = images.len(),
        total_tokens,
        total_cost = %total_cost,
        "image tokens calculated"
    );

    Ok(Calculation {
        model: model.name.clone(),
        calculation_type: model.calculation_type(),
        images,
        total_tokens,
        total_cost,
    })
}

/// Cleared aggregates. Image records are the caller's and are left alone.
pub fn reset() -> CalculationTotals {
    CalculationTotals::default()
}
