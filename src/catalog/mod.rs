//! 模型目录模块：内置模型计费参数，并支持从 YAML/JSON 文件加载或覆盖。
//!
//! # Model Catalog
//!
//! Named [`ModelConfig`] values. The built-in list carries the published
//! parameters; a catalog file can add models or override built-ins by name.
//!
//! ## File format
//!
//! ```yaml
//! models:
//!   - name: gpt-4o
//!     calculationType: tile
//!     costPerMillionTokens: 2.5
//!     tokensPerTile: 170
//!     baseTokens: 85
//!     maxImageDimension: 2048
//!     imageMinSizeLength: 768
//!     tileSizeLength: 512
//!   - name: gpt-5-mini
//!     calculationType: patch
//!     costPerMillionTokens: 0.25
//!     patchSize: 32
//!     maxPatches: 1536
//!     multiplier: 1.62
//! ```
//!
//! Files ending in `.json` are read as JSON with the same shape; anything else
//! is read as YAML.

pub mod presets;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::types::{ModelConfig, RawModelConfig};
use crate::{Error, Result};

/// Environment variable naming a catalog file to overlay on the built-ins.
pub const MODELS_ENV: &str = "VISION_TOKENS_MODELS";

static BUILTIN: once_cell::sync::Lazy<ModelCatalog> =
    once_cell::sync::Lazy::new(|| ModelCatalog {
        models: presets::all(),
    });

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Vec<RawModelConfig>,
}

#[derive(Serialize)]
struct CatalogFileRef<'a> {
    models: &'a [ModelConfig],
}

/// Ordered collection of models, looked up case-insensitively by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    models: Vec<ModelConfig>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in published models.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Built-ins overlaid with the file named by [`MODELS_ENV`], when set.
    pub fn load() -> Result<Self> {
        let mut catalog = Self::builtin();
        if let Ok(path) = std::env::var(MODELS_ENV) {
            debug!(path = %path, "loading model catalog from {}", MODELS_ENV);
            catalog.merge(Self::from_path(&path)?);
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::from_raw(file.models)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_raw(file.models)
    }

    fn from_raw(raw: Vec<RawModelConfig>) -> Result<Self> {
        let mut catalog = Self::new();
        for (index, entry) in raw.into_iter().enumerate() {
            let model = ModelConfig::try_from(entry).map_err(|e| scope_error(e, index))?;
            catalog.insert(model);
        }
        Ok(catalog)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&CatalogFileRef {
            models: &self.models,
        })?)
    }

    /// Add a model, replacing any existing one with the same name in place.
    pub fn insert(&mut self, model: ModelConfig) {
        match self
            .models
            .iter_mut()
            .find(|m| m.name.eq_ignore_ascii_case(&model.name))
        {
            Some(existing) => {
                if *existing != model {
                    warn!(model = %model.name, "catalog entry overrides an existing model");
                }
                *existing = model;
            }
            None => self.models.push(model),
        }
    }

    /// Overlay `other` on this catalog.
    pub fn merge(&mut self, other: ModelCatalog) {
        for model in other.models {
            self.insert(model);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelConfig> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Like [`get`](Self::get), but a miss is an error listing what is available.
    pub fn require(&self, name: &str) -> Result<&ModelConfig> {
        self.get(name).ok_or_else(|| {
            Error::ModelNotFound {
                name: name.to_string(),
                hint: None,
            }
            .with_hint(format!("available models: {}", self.names().join(", ")))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelConfig> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

// Prefix the field path with the entry position so file errors point at a line item.
fn scope_error(err: Error, index: usize) -> Error {
    match err {
        Error::InvalidModelConfig {
            message,
            mut context,
        } => {
            let field = context.field_path.take().unwrap_or_default();
            context.field_path = Some(format!("models[{}].{}", index, field));
            Error::InvalidModelConfig { message, context }
        }
        other => other,
    }
}
