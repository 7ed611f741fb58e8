use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::bitmask::BitMask;
use crate::element::AoiElement;
use crate::error::Result;
use crate::graphic::GraphicGroup;

/// Saved form of an [`AoiElement`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AoiDocument {
    pub name: String,
    #[serde(default)]
    pub all_points_toggled: bool,
    pub objects: GraphicGroup,
    /// Rasterized selection, rebuilt from `objects` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<BitMask>,
}

impl From<&AoiElement> for AoiDocument {
    fn from(aoi: &AoiElement) -> Self {
        Self {
            name: aoi.name().to_owned(),
            all_points_toggled: aoi.all_points_toggled(),
            objects: aoi.group().clone(),
            selection: aoi.cached_selection().cloned(),
        }
    }
}

impl From<AoiDocument> for AoiElement {
    fn from(document: AoiDocument) -> Self {
        AoiElement::from_parts(
            document.name,
            document.objects,
            document.all_points_toggled,
            document.selection,
        )
    }
}

impl AoiElement {
    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&AoiDocument::from(self))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: AoiDocument = serde_json::from_str(json)?;
        Ok(document.into())
    }

    /// Save as JSON to file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Load from a JSON file written by [`AoiElement::save_json`]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
