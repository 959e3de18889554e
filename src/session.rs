//! Calculation session: owns the selected model, the ordered image list and the
//! last computed totals.

use tracing::debug;

use crate::tokens::{self, CalculationTotals};
use crate::types::{ImageField, ImageRecord, ModelConfig};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct CalcSession {
    model: Option<ModelConfig>,
    images: Vec<ImageRecord>,
    totals: CalculationTotals,
}

impl CalcSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: ModelConfig) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    pub fn set_model(&mut self, model: ModelConfig) {
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&ModelConfig> {
        self.model.as_ref()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn totals(&self) -> CalculationTotals {
        self.totals
    }

    pub fn add_image(&mut self, image: ImageRecord) {
        self.images.push(image);
    }

    pub fn update_image(&mut self, index: usize, field: ImageField, value: u32) -> Result<()> {
        let len = self.images.len();
        let image = self
            .images
            .get_mut(index)
            .ok_or(Error::ImageIndexOutOfRange { index, len })?;
        image.set_field(field, value);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Result<ImageRecord> {
        if index >= self.images.len() {
            return Err(Error::ImageIndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        Ok(self.images.remove(index))
    }

    /// Recompute over the current list. Images are replaced by their annotated
    /// copies and the totals stored; on error the session is left unchanged.
    pub fn run_calculation(&mut self) -> Result<CalculationTotals> {
        let model = self.model.as_ref().ok_or(Error::NoModelSelected)?;
        let calc = tokens::recalculate(model, &self.images)?;
        self.images = calc.images;
        self.totals = CalculationTotals {
            total_tokens: Some(calc.total_tokens),
            total_cost: Some(calc.total_cost),
        };
        Ok(self.totals)
    }

    /// Clear the totals; images and their estimates stay.
    pub fn reset_calculation(&mut self) {
        debug!("calculation totals reset");
        self.totals = tokens::reset();
    }
}
