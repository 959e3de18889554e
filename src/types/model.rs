//! Billing configuration for one model.
//!
//! The wire form is flat and camelCase (`calculationType`, `costPerMillionTokens`,
//! `tokensPerTile`, `patchSize`, ...). It is parsed through [`RawModelConfig`] so
//! that an unknown calculation type or a missing/non-positive field is reported as
//! a crate [`Error`] naming the offending field, instead of a generic serde error.

use serde::{Deserialize, Serialize};

use crate::{Error, ErrorContext, Result};

/// Calculation family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    Tile,
    Patch,
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Patch => "patch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tile" => Some(Self::Tile),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }
}

/// Parameters of the tile scheme (GPT-4o, GPT-4.1, GPT-5, o-series).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileParams {
    pub tokens_per_tile: u64,
    /// Flat overhead charged once per request.
    pub base_tokens: u64,
    pub max_image_dimension: u32,
    pub image_min_size_length: u32,
    pub tile_size_length: u32,
}

impl TileParams {
    /// Standard 2048px bound, 768px short side, 512px tiles.
    pub fn standard(tokens_per_tile: u64, base_tokens: u64) -> Self {
        Self {
            tokens_per_tile,
            base_tokens,
            max_image_dimension: 2048,
            image_min_size_length: 768,
            tile_size_length: 512,
        }
    }
}

/// Upper bound accepted for [`PatchParams::multiplier`].
pub const MAX_PATCH_MULTIPLIER: f64 = 1_000.0;

/// Parameters of the patch scheme (GPT-4.1 mini/nano, GPT-5 mini/nano, o4-mini).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchParams {
    pub patch_size: u32,
    pub max_patches: u64,
    /// Applied to the capped patch count before rounding up to tokens.
    pub multiplier: f64,
}

impl PatchParams {
    /// Standard 32px patches with a 1536 patch budget.
    pub fn standard(multiplier: f64) -> Self {
        Self {
            patch_size: 32,
            max_patches: 1536,
            multiplier,
        }
    }
}

/// The two mutually exclusive billing families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BillingScheme {
    Tile(TileParams),
    Patch(PatchParams),
}

impl BillingScheme {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            Self::Tile(_) => CalculationType::Tile,
            Self::Patch(_) => CalculationType::Patch,
        }
    }
}

/// A billable model: name, price and the scheme used to count image tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelConfig", into = "RawModelConfig")]
pub struct ModelConfig {
    pub name: String,
    pub cost_per_million_tokens: f64,
    pub scheme: BillingScheme,
}

impl ModelConfig {
    pub fn tile(name: impl Into<String>, cost_per_million_tokens: f64, params: TileParams) -> Self {
        Self {
            name: name.into(),
            cost_per_million_tokens,
            scheme: BillingScheme::Tile(params),
        }
    }

    pub fn patch(
        name: impl Into<String>,
        cost_per_million_tokens: f64,
        params: PatchParams,
    ) -> Self {
        Self {
            name: name.into(),
            cost_per_million_tokens,
            scheme: BillingScheme::Patch(params),
        }
    }

    pub fn calculation_type(&self) -> CalculationType {
        self.scheme.calculation_type()
    }

    /// Reject zero, negative or non-finite values in the fields the selected
    /// scheme uses. The other family's fields do not exist at this level.
    pub fn validate(&self) -> Result<()> {
        if !(self.cost_per_million_tokens.is_finite() && self.cost_per_million_tokens > 0.0) {
            return Err(self.invalid(
                "costPerMillionTokens",
                format!("must be positive, got {}", self.cost_per_million_tokens),
            ));
        }
        match &self.scheme {
            BillingScheme::Tile(t) => {
                let required = [
                    ("tokensPerTile", t.tokens_per_tile),
                    ("maxImageDimension", u64::from(t.max_image_dimension)),
                    ("imageMinSizeLength", u64::from(t.image_min_size_length)),
                    ("tileSizeLength", u64::from(t.tile_size_length)),
                ];
                for (field, value) in required {
                    if value == 0 {
                        return Err(self.invalid(field, "must be positive, got 0"));
                    }
                }
            }
            BillingScheme::Patch(p) => {
                if p.patch_size == 0 {
                    return Err(self.invalid("patchSize", "must be positive, got 0"));
                }
                if p.max_patches == 0 {
                    return Err(self.invalid("maxPatches", "must be positive, got 0"));
                }
                if !(p.multiplier > 0.0 && p.multiplier <= MAX_PATCH_MULTIPLIER) {
                    return Err(self.invalid(
                        "multiplier",
                        format!(
                            "must be in (0, {}], got {}",
                            MAX_PATCH_MULTIPLIER, p.multiplier
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, field: &str, details: impl Into<String>) -> Error {
        Error::model_config_with_context(
            format!("model '{}' has an invalid {}", self.name, field),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(details)
                .with_source("model_validator"),
        )
    }
}

/// Flat, all-optional wire form of [`ModelConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModelConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_million_tokens: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_per_tile: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_tokens: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_image_dimension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_min_size_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_patches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

impl RawModelConfig {
    fn missing(&self, field: &str) -> Error {
        Error::model_config_with_context(
            format!("model '{}' is missing {}", self.name, field),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("model_parser"),
        )
    }

    fn real(&self, field: &str, value: Option<f64>) -> Result<f64> {
        value.ok_or_else(|| self.missing(field))
    }

    /// Whole number in `[min, max]`.
    fn whole(&self, field: &str, value: Option<f64>, min: f64, max: f64) -> Result<f64> {
        let v = self.real(field, value)?;
        if !v.is_finite() || v.fract() != 0.0 || v < min || v > max {
            return Err(Error::model_config_with_context(
                format!("model '{}' has an invalid {}", self.name, field),
                ErrorContext::new()
                    .with_field_path(field)
                    .with_details(format!("expected a whole number >= {}, got {}", min, v))
                    .with_source("model_parser"),
            ));
        }
        Ok(v)
    }

    fn dimension(&self, field: &str, value: Option<f64>) -> Result<u32> {
        Ok(self.whole(field, value, 1.0, f64::from(u32::MAX))? as u32)
    }

    fn count(&self, field: &str, value: Option<f64>, min: f64) -> Result<u64> {
        // Whole numbers above 2^53 lose precision in f64; cap there.
        Ok(self.whole(field, value, min, 9_007_199_254_740_992.0)? as u64)
    }
}

impl TryFrom<RawModelConfig> for ModelConfig {
    type Error = Error;

    fn try_from(raw: RawModelConfig) -> Result<Self> {
        // Entries without a type tag bill as tiles.
        let kind = match raw.calculation_type.as_deref() {
            None => CalculationType::Tile,
            Some(s) => CalculationType::from_str(s)
                .ok_or_else(|| Error::UnknownCalculationType(s.to_string()))?,
        };
        let cost_per_million_tokens = raw.real("costPerMillionTokens", raw.cost_per_million_tokens)?;
        let scheme = match kind {
            CalculationType::Tile => BillingScheme::Tile(TileParams {
                tokens_per_tile: raw.count("tokensPerTile", raw.tokens_per_tile, 1.0)?,
                base_tokens: raw.count("baseTokens", raw.base_tokens, 0.0)?,
                max_image_dimension: raw.dimension("maxImageDimension", raw.max_image_dimension)?,
                image_min_size_length: raw
                    .dimension("imageMinSizeLength", raw.image_min_size_length)?,
                tile_size_length: raw.dimension("tileSizeLength", raw.tile_size_length)?,
            }),
            CalculationType::Patch => BillingScheme::Patch(PatchParams {
                patch_size: raw.dimension("patchSize", raw.patch_size)?,
                max_patches: raw.count("maxPatches", raw.max_patches, 1.0)?,
                multiplier: raw.real("multiplier", raw.multiplier)?,
            }),
        };
        let model = ModelConfig {
            name: raw.name,
            cost_per_million_tokens,
            scheme,
        };
        model.validate()?;
        Ok(model)
    }
}

impl From<ModelConfig> for RawModelConfig {
    fn from(model: ModelConfig) -> Self {
        let mut raw = RawModelConfig {
            name: model.name,
            calculation_type: Some(model.scheme.calculation_type().as_str().to_string()),
            cost_per_million_tokens: Some(model.cost_per_million_tokens),
            ..Default::default()
        };
        match model.scheme {
            BillingScheme::Tile(t) => {
                raw.tokens_per_tile = Some(t.tokens_per_tile as f64);
                raw.base_tokens = Some(t.base_tokens as f64);
                raw.max_image_dimension = Some(f64::from(t.max_image_dimension));
                raw.image_min_size_length = Some(f64::from(t.image_min_size_length));
                raw.tile_size_length = Some(f64::from(t.tile_size_length));
            }
            BillingScheme::Patch(p) => {
                raw.patch_size = Some(f64::from(p.patch_size));
                raw.max_patches = Some(p.max_patches as f64);
                raw.multiplier = Some(p.multiplier);
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tile_model() {
        let yaml = r#"
name: gpt-4o
calculationType: tile
costPerMillionTokens: 2.5
tokensPerTile: 170
baseTokens: 85
maxImageDimension: 2048
imageMinSizeLength: 768
tileSizeLength: 512
"#;
        let model: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.calculation_type(), CalculationType::Tile);
        assert_eq!(
            model.scheme,
            BillingScheme::Tile(TileParams::standard(170, 85))
        );
    }

    #[test]
    fn test_parse_patch_model_ignores_tile_fields() {
        let raw = RawModelConfig {
            name: "gpt-5-mini".into(),
            calculation_type: Some("patch".into()),
            cost_per_million_tokens: Some(0.25),
            patch_size: Some(32.0),
            max_patches: Some(1536.0),
            multiplier: Some(1.62),
            tokens_per_tile: Some(-1.0),
            ..Default::default()
        };
        let model = ModelConfig::try_from(raw).unwrap();
        assert_eq!(model.scheme, BillingScheme::Patch(PatchParams::standard(1.62)));
    }

    #[test]
    fn test_unknown_calculation_type() {
        let raw = RawModelConfig {
            name: "mystery".into(),
            calculation_type: Some("pixel".into()),
            cost_per_million_tokens: Some(1.0),
            ..Default::default()
        };
        let err = ModelConfig::try_from(raw).unwrap_err();
        assert!(matches!(err, Error::UnknownCalculationType(ref t) if t == "pixel"));
    }

    #[test]
    fn test_missing_field_reports_path() {
        let raw = RawModelConfig {
            name: "half".into(),
            calculation_type: Some("patch".into()),
            cost_per_million_tokens: Some(1.0),
            patch_size: Some(32.0),
            multiplier: Some(1.0),
            ..Default::default()
        };
        let err = ModelConfig::try_from(raw).unwrap_err();
        let ctx = err.context().expect("context");
        assert_eq!(ctx.field_path.as_deref(), Some("maxPatches"));
    }

    #[test]
    fn test_non_positive_fields_rejected() {
        let raw = RawModelConfig {
            name: "bad".into(),
            calculation_type: Some("tile".into()),
            cost_per_million_tokens: Some(1.0),
            tokens_per_tile: Some(170.0),
            base_tokens: Some(85.0),
            max_image_dimension: Some(2048.0),
            image_min_size_length: Some(768.0),
            tile_size_length: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            ModelConfig::try_from(raw),
            Err(Error::InvalidModelConfig { .. })
        ));

        let model = ModelConfig::patch("neg", 1.0, PatchParams::standard(-1.0));
        let err = model.validate().unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("multiplier")
        );

        let model = ModelConfig::patch("huge", 1.0, PatchParams::standard(1e300));
        assert!(matches!(
            model.validate(),
            Err(Error::InvalidModelConfig { .. })
        ));

        let model = ModelConfig::tile("free", 0.0, TileParams::standard(170, 85));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_serialize_is_flat() {
        let model = ModelConfig::patch("o4-mini", 1.1, PatchParams::standard(1.72));
        let v = serde_json::to_value(&model).unwrap();
        assert_eq!(v["calculationType"], "patch");
        assert_eq!(v["patchSize"], 32.0);
        assert!(v.get("tokensPerTile").is_none());
        let back: ModelConfig = serde_json::from_value(v).unwrap();
        assert_eq!(back, model);
    }
}
