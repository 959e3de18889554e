//! 类型模块：模型计费配置与图像记录。
//!
//! # Types Module
//!
//! Strongly-typed inputs and outputs of the calculator.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ModelConfig`] | Model name, price and billing scheme |
//! | [`BillingScheme`] | Tile or patch parameters (tagged variant) |
//! | [`ImageRecord`] | Caller-owned image with optional estimate |
//! | [`ImageEstimate`] | Resized size, grid and tokens for one image |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`image`] | Image records and estimates |
//! | [`model`] | Model configuration and its wire form |

pub mod image;
pub mod model;

pub use image::{ImageEstimate, ImageField, ImageRecord};
pub use model::{
    BillingScheme, CalculationType, ModelConfig, PatchParams, RawModelConfig, TileParams,
};
