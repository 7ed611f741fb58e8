use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::bitmask::BitMask;
use crate::element::AoiElement;
use crate::error::Result;
use crate::graphic::GraphicShape;
use crate::types::{BoundingBox, ModeType, PixelLocation, RasterDescriptor};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum AoiCommand {
    /// Paint a rectangle, corners inclusive
    #[serde(rename = "add_rectangle")]
    AddRectangle {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        #[serde(default)]
        mode: ModeType,
    },

    /// Paint the ellipse inscribed in a rectangle
    #[serde(rename = "add_ellipse")]
    AddEllipse {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        #[serde(default)]
        mode: ModeType,
    },

    /// Paint a filled polygon
    #[serde(rename = "add_polygon")]
    AddPolygon {
        #[schemars(length(min = 1))]
        vertices: Vec<PixelLocation>,
        #[serde(default)]
        mode: ModeType,
    },

    /// Select individual pixels
    #[serde(rename = "add_points")]
    AddPoints { points: Vec<PixelLocation> },

    /// Deselect individual pixels
    #[serde(rename = "remove_points")]
    RemovePoints { points: Vec<PixelLocation> },

    /// Flip individual pixels
    #[serde(rename = "toggle_points")]
    TogglePoints { points: Vec<PixelLocation> },

    /// Select the pixels of a grayscale image brighter than a threshold
    #[serde(rename = "add_image")]
    AddImage {
        path: PathBuf,
        #[serde(default = "default_threshold")]
        threshold: u8,
    },

    /// Invert the whole selection
    #[serde(rename = "toggle_all")]
    ToggleAll,

    /// Remove every object and reset the toggled state
    #[serde(rename = "clear")]
    Clear,

    /// Union with the selection of a saved AOI document
    #[serde(rename = "merge")]
    Merge { path: PathBuf },

    /// Intersection with the selection of a saved AOI document
    #[serde(rename = "intersect")]
    Intersect { path: PathBuf },
}

fn default_threshold() -> u8 {
    128
}

impl AoiCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AoiCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::AddRectangle { .. } => "Apply a rectangle to the selection with the given mode",
            Self::AddEllipse { .. } => "Apply the ellipse inscribed in a rectangle with the given mode",
            Self::AddPolygon { .. } => "Apply a filled polygon, boundary included, with the given mode",
            Self::AddPoints { .. } => "Select a list of pixels",
            Self::RemovePoints { .. } => "Deselect a list of pixels",
            Self::TogglePoints { .. } => "Flip a list of pixels",
            Self::AddImage { .. } => "Select every pixel of a grayscale image brighter than the threshold",
            Self::ToggleAll => "Invert the selection over the whole grid",
            Self::Clear => "Remove every object and reset the inversion",
            Self::Merge { .. } => "Add the selection of another AOI document",
            Self::Intersect { .. } => "Keep only pixels also selected in another AOI document",
        }
    }

    /// Get parameter requirements for the command
    pub fn parameters_info(&self) -> Vec<(&'static str, &'static str, bool)> {
        let corners = vec![
            ("x1", "Left column", true),
            ("y1", "Top row", true),
            ("x2", "Right column, inclusive", true),
            ("y2", "Bottom row, inclusive", true),
            ("mode", "draw, erase or toggle (default draw)", false),
        ];
        match self {
            Self::AddRectangle { .. } | Self::AddEllipse { .. } => corners,
            Self::AddPolygon { .. } => vec![
                ("vertices", "Polygon vertices as {x, y} pixel locations", true),
                ("mode", "draw, erase or toggle (default draw)", false),
            ],
            Self::AddPoints { .. } | Self::RemovePoints { .. } | Self::TogglePoints { .. } => {
                vec![("points", "Pixel locations as {x, y}", true)]
            }
            Self::AddImage { .. } => vec![
                ("path", "Grayscale image file", true),
                ("threshold", "Gray level that selected pixels must exceed (default 128)", false),
            ],
            Self::ToggleAll | Self::Clear => vec![],
            Self::Merge { .. } | Self::Intersect { .. } => {
                vec![("path", "AOI document saved as JSON", true)]
            }
        }
    }
}

/// State of an AOI after a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AoiSummary {
    pub name: String,
    /// Selected pixels inside the regular bounding box
    pub count: u64,
    pub outside_selected: bool,
    pub bounding_box: BoundingBox,
    pub minimal_bounding_box: BoundingBox,
    /// Selected pixels within the raster extent
    pub raster_count: u64,
    pub objects: usize,
}

/// Runs [`AoiCommand`]s against one AOI bound to a raster extent.
#[derive(Debug)]
pub struct AoiManager {
    aoi: AoiElement,
    raster: RasterDescriptor,
}

impl AoiManager {
    pub fn new(aoi: AoiElement, raster: RasterDescriptor) -> Self {
        Self { aoi, raster }
    }

    pub fn aoi(&self) -> &AoiElement {
        &self.aoi
    }

    pub fn aoi_mut(&mut self) -> &mut AoiElement {
        &mut self.aoi
    }

    pub fn into_aoi(self) -> AoiElement {
        self.aoi
    }

    pub fn raster(&self) -> RasterDescriptor {
        self.raster
    }

    pub fn execute(&mut self, command: AoiCommand) -> Result<AoiSummary> {
        tracing::debug!(command = %command, aoi = self.aoi.name(), "executing command");
        match command {
            AoiCommand::AddRectangle { x1, y1, x2, y2, mode } => {
                self.aoi.add_object(GraphicShape::rectangle(x1, y1, x2, y2), mode);
            }
            AoiCommand::AddEllipse { x1, y1, x2, y2, mode } => {
                self.aoi.add_object(GraphicShape::ellipse(x1, y1, x2, y2), mode);
            }
            AoiCommand::AddPolygon { vertices, mode } => {
                self.aoi.add_object(GraphicShape::Polygon { vertices }, mode);
            }
            AoiCommand::AddPoints { points } => {
                self.aoi.add_points(&points);
            }
            AoiCommand::RemovePoints { points } => {
                self.aoi.remove_points(&points);
            }
            AoiCommand::TogglePoints { points } => {
                self.aoi.toggle_points(&points);
            }
            AoiCommand::AddImage { path, threshold } => {
                let mask = BitMask::from_image_file(&path, threshold)?;
                self.aoi.add_points(&mask);
            }
            AoiCommand::ToggleAll => self.aoi.toggle_all_points(),
            AoiCommand::Clear => self.aoi.clear_points(),
            AoiCommand::Merge { path } => {
                let other = AoiElement::from_json_file(&path)?;
                self.aoi.add_points(other.selected_points());
            }
            AoiCommand::Intersect { path } => {
                let other = AoiElement::from_json_file(&path)?;
                let mut excluded = other.selected_points().clone();
                excluded.invert();
                self.aoi.remove_points(&excluded);
            }
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> AoiSummary {
        let mask = self.aoi.selected_points();
        AoiSummary {
            name: self.aoi.name().to_owned(),
            count: mask.count(),
            outside_selected: mask.is_outside_selected(),
            bounding_box: mask.bounding_box(),
            minimal_bounding_box: mask.minimal_bounding_box(),
            raster_count: self.aoi.pixels(&self.raster).pixel_count(),
            objects: self.aoi.group().len(),
        }
    }
}
