use serde::{Deserialize, Serialize};

use crate::canopy::{AbsorptionCategory, LeavesCategory};
use crate::formalisms::LayerSpan;
use crate::formalisms::sunlit_shaded_leaves::SunlitShadedAbsorption;

/// Irradiance absorbed by one leaf layer, shaped by the canopy's leaves category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "leaves_category", content = "absorbed", rename_all = "kebab-case")]
pub enum LayerAbsorption {
    Lumped(f64),
    SunlitShaded(SunlitShadedAbsorption),
}

impl LayerAbsorption {
    pub fn leaves_category(&self) -> LeavesCategory {
        match self {
            LayerAbsorption::Lumped(_) => LeavesCategory::Lumped,
            LayerAbsorption::SunlitShaded(_) => LeavesCategory::SunlitShaded,
        }
    }

    /// Absorbed irradiance of one category, `None` if the layer does not carry it
    pub fn absorbed_by(&self, category: AbsorptionCategory) -> Option<f64> {
        match (self, category) {
            (LayerAbsorption::Lumped(absorbed), AbsorptionCategory::Lumped) => Some(*absorbed),
            (LayerAbsorption::SunlitShaded(absorption), AbsorptionCategory::Sunlit) => Some(absorption.sunlit_total()),
            (LayerAbsorption::SunlitShaded(absorption), AbsorptionCategory::Shaded) => Some(absorption.shaded_total()),
            _ => None,
        }
    }

    pub fn total(&self) -> f64 {
        match self {
            LayerAbsorption::Lumped(absorbed) => *absorbed,
            LayerAbsorption::SunlitShaded(absorption) => absorption.total(),
        }
    }
}

/// One canopy layer with its position in the canopy and its absorbed irradiance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafLayer {
    pub index: i32,
    /// [m2leaf m-2ground] leaf area index of all layers above
    pub upper_cumulative_leaf_area_index: f64,
    /// [m2leaf m-2ground]
    pub thickness: f64,
    pub absorbed_irradiance: LayerAbsorption,
}

impl LeafLayer {
    pub fn span(&self) -> LayerSpan {
        LayerSpan::new(self.upper_cumulative_leaf_area_index, self.thickness)
    }

    pub fn absorbed_by(&self, category: AbsorptionCategory) -> Option<f64> {
        self.absorbed_irradiance.absorbed_by(category)
    }

    /// Sunlit/shaded breakdown, `None` for lumped layers
    pub fn sunlit_shaded(&self) -> Option<&SunlitShadedAbsorption> {
        match &self.absorbed_irradiance {
            LayerAbsorption::SunlitShaded(absorption) => Some(absorption),
            LayerAbsorption::Lumped(_) => None,
        }
    }
}
