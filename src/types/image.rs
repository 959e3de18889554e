//! Image records supplied by the caller and the estimate attached to them.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One input image: source pixel size plus how many times it is billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
    /// Filled in by a calculation; `None` until the first run.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<ImageEstimate>,
}

fn default_multiplier() -> u32 {
    1
}

impl ImageRecord {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            multiplier: 1,
            estimate: None,
        }
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Copy of this record carrying `estimate`.
    pub fn annotated(&self, estimate: ImageEstimate) -> Self {
        Self {
            estimate: Some(estimate),
            ..self.clone()
        }
    }

    /// Check the preconditions every calculator relies on.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimension {
                index,
                width: self.width,
                height: self.height,
            });
        }
        if self.multiplier == 0 {
            return Err(Error::InvalidMultiplier { index });
        }
        Ok(())
    }

    /// Update a single input field, dropping any stale estimate.
    pub fn set_field(&mut self, field: ImageField, value: u32) {
        match field {
            ImageField::Width => self.width = value,
            ImageField::Height => self.height = value,
            ImageField::Multiplier => self.multiplier = value,
        }
        self.estimate = None;
    }
}

/// Per-image output of a calculation.
///
/// Under the patch scheme `tiles_wide`/`tiles_high` hold the patch grid and
/// `total_tiles` the capped patch count times the image multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEstimate {
    pub resized_width: u32,
    pub resized_height: u32,
    pub tiles_wide: u32,
    pub tiles_high: u32,
    pub total_tiles: u64,
    pub tokens: u64,
}

/// Editable input attributes of an [`ImageRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageField {
    Width,
    Height,
    Multiplier,
}

impl ImageField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Multiplier => "multiplier",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "multiplier" => Some(Self::Multiplier),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_side() {
        let err = ImageRecord::new(0, 10).validate(3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDimension {
                index: 3,
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_multiplier() {
        let err = ImageRecord::new(10, 10)
            .with_multiplier(0)
            .validate(0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMultiplier { index: 0 }));
    }

    #[test]
    fn test_set_field_clears_estimate() {
        let mut img = ImageRecord::new(10, 10).annotated(ImageEstimate {
            resized_width: 10,
            resized_height: 10,
            tiles_wide: 1,
            tiles_high: 1,
            total_tiles: 1,
            tokens: 255,
        });
        img.set_field(ImageField::Multiplier, 2);
        assert_eq!(img.multiplier, 2);
        assert!(img.estimate.is_none());
    }

    #[test]
    fn test_deserialize_defaults_multiplier() {
        let img: ImageRecord = serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(img.multiplier, 1);
        assert!(img.estimate.is_none());
    }

    #[test]
    fn test_serialize_flattens_estimate() {
        let img = ImageRecord::new(512, 512).annotated(ImageEstimate {
            resized_width: 512,
            resized_height: 512,
            tiles_wide: 1,
            tiles_high: 1,
            total_tiles: 1,
            tokens: 170,
        });
        let v = serde_json::to_value(&img).unwrap();
        assert_eq!(v["resizedWidth"], 512);
        assert_eq!(v["totalTiles"], 1);
        assert_eq!(v["tokens"], 170);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ImageField::from_str("height"), Some(ImageField::Height));
        assert_eq!(ImageField::Multiplier.as_str(), "multiplier");
        assert_eq!(ImageField::from_str("depth"), None);
    }
}
