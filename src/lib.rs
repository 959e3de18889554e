//! # vision-token-calc
//!
//! 视觉模型图像输入 Token 与费用计算库，支持分块（tile）与补丁（patch）两种计费方式。
//!
//! Image input token and cost calculator for vision-capable model APIs.
//!
//! ## Overview
//!
//! Vision models bill an input image as a number of tokens derived from its
//! pixel size. Two billing families exist across model generations:
//!
//! - **Tile**: resize into a bounding box and a maximum short side, then charge a
//!   fixed number of tokens per 512px tile plus a flat base per request.
//! - **Patch**: count 32px patches, shrink to a patch budget when over it, and
//!   scale the capped count by a model-specific multiplier.
//!
//! The calculation is pure and synchronous: [`tokens::recalculate`] takes a
//! [`ModelConfig`] and a slice of [`ImageRecord`]s and returns annotated copies
//! plus the total tokens and cost.
//!
//! ## Quick Start
//!
//! ```rust
//! use vision_token_calc::{ImageRecord, ModelCatalog};
//! use vision_token_calc::tokens::recalculate;
//!
//! let catalog = ModelCatalog::builtin();
//! let model = catalog.require("gpt-4o")?;
//! let images = vec![
//!     ImageRecord::new(1024, 1024),
//!     ImageRecord::new(4000, 2000).with_multiplier(2),
//! ];
//!
//! let calc = recalculate(model, &images)?;
//! println!("{} tokens, ${}", calc.total_tokens, calc.total_cost);
//! # Ok::<(), vision_token_calc::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tokens`] | Resize, tile/patch counting, aggregation and pricing |
//! | [`types`] | Model configuration and image records |
//! | [`catalog`] | Built-in models and YAML/JSON catalog files |
//! | [`session`] | Stateful list of images with stored totals |

pub mod catalog;
pub mod session;
pub mod tokens;
pub mod types;

pub use catalog::ModelCatalog;
pub use session::CalcSession;
pub use tokens::{recalculate, reset, Calculation, CalculationTotals, FixedCost};
pub use types::{
    BillingScheme, CalculationType, ImageEstimate, ImageField, ImageRecord, ModelConfig,
    PatchParams, TileParams,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
