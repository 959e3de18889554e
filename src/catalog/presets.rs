//! Published image billing parameters for OpenAI vision models.

use crate::types::{ModelConfig, PatchParams, TileParams};

pub fn gpt_4o() -> ModelConfig {
    ModelConfig::tile("gpt-4o", 2.50, TileParams::standard(170, 85))
}

pub fn gpt_4o_mini() -> ModelConfig {
    ModelConfig::tile("gpt-4o-mini", 0.15, TileParams::standard(5667, 2833))
}

pub fn gpt_4_1() -> ModelConfig {
    ModelConfig::tile("gpt-4.1", 2.00, TileParams::standard(170, 85))
}

pub fn gpt_4_1_mini() -> ModelConfig {
    ModelConfig::patch("gpt-4.1-mini", 0.40, PatchParams::standard(1.62))
}

pub fn gpt_4_1_nano() -> ModelConfig {
    ModelConfig::patch("gpt-4.1-nano", 0.10, PatchParams::standard(2.46))
}

pub fn gpt_5() -> ModelConfig {
    ModelConfig::tile("gpt-5", 1.25, TileParams::standard(140, 70))
}

pub fn gpt_5_mini() -> ModelConfig {
    ModelConfig::patch("gpt-5-mini", 0.25, PatchParams::standard(1.62))
}

pub fn gpt_5_nano() -> ModelConfig {
    ModelConfig::patch("gpt-5-nano", 0.05, PatchParams::standard(2.46))
}

pub fn o1() -> ModelConfig {
    ModelConfig::tile("o1", 15.00, TileParams::standard(150, 75))
}

pub fn o3() -> ModelConfig {
    ModelConfig::tile("o3", 2.00, TileParams::standard(150, 75))
}

pub fn o4_mini() -> ModelConfig {
    ModelConfig::patch("o4-mini", 1.10, PatchParams::standard(1.72))
}

pub fn all() -> Vec<ModelConfig> {
    vec![
        gpt_4o(),
        gpt_4o_mini(),
        gpt_4_1(),
        gpt_4_1_mini(),
        gpt_4_1_nano(),
        gpt_5(),
        gpt_5_mini(),
        gpt_5_nano(),
        o1(),
        o3(),
        o4_mini(),
    ]
}
