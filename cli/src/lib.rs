use aoi::{AoiCommand, AoiElement, AoiError, AoiManager, AoiSummary, RasterDescriptor};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    AoiError(#[from] AoiError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Raster the AOI is evaluated against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RasterSection {
    pub rows: u32,
    pub columns: u32,
}

impl From<RasterSection> for RasterDescriptor {
    fn from(section: RasterSection) -> Self {
        RasterDescriptor::new(section.rows, section.columns)
    }
}

/// A named sequence of AOI commands
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AoiScript {
    pub name: String,
    pub raster: RasterSection,
    /// AOI document to start from instead of an empty AOI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub commands: Vec<AoiCommand>,
}

/// Result of [`AoiScript::run`]
#[derive(Debug)]
pub struct ScriptRun {
    pub manager: AoiManager,
    /// Summary after each command, in order
    pub summaries: Vec<AoiSummary>,
}

impl AoiScript {
    /// Load AoiScript configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load AoiScript configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load AoiScript configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load AoiScript configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Save AoiScript configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Convert AoiScript to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Save AoiScript configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Convert AoiScript to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Execute every command in order against the starting AOI
    pub fn run(&self) -> Result<ScriptRun, CliError> {
        let aoi = match &self.input {
            Some(path) => {
                info!("Loading AOI document {:?}", path);
                let mut aoi = AoiElement::from_json_file(path)?;
                aoi.rename(self.name.clone());
                aoi
            }
            None => AoiElement::new(self.name.clone()),
        };

        let mut manager = AoiManager::new(aoi, self.raster.into());
        let mut summaries = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            let summary = manager.execute(command.clone())?;
            info!(
                "{}: {} selected in raster, bounding box {:?}",
                command, summary.raster_count, summary.minimal_bounding_box
            );
            summaries.push(summary);
        }
        Ok(ScriptRun { manager, summaries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoi::{BoundingBox, ModeType, PixelLocation};
    use tempfile::tempdir;

    const SCRIPT: &str = r#"
name = "field"

[raster]
rows = 181
columns = 97

[[commands]]
type = "add_rectangle"
params = { x1 = 20, y1 = 70, x2 = 69, y2 = 109 }

[[commands]]
type = "remove_points"
params = { points = [{ x = 20, y = 70 }, { x = 69, y = 109 }] }

[[commands]]
type = "toggle_all"
"#;

    #[test]
    fn test_parse_toml_script() {
        let script = AoiScript::from_toml(SCRIPT).expect("Should parse the script");
        assert_eq!(script.raster, RasterSection { rows: 181, columns: 97 });
        assert_eq!(script.commands.len(), 3);
        assert_eq!(
            script.commands[0],
            AoiCommand::AddRectangle { x1: 20, y1: 70, x2: 69, y2: 109, mode: ModeType::Draw }
        );
        assert_eq!(
            script.commands[1],
            AoiCommand::RemovePoints {
                points: vec![PixelLocation::new(20, 70), PixelLocation::new(69, 109)]
            }
        );
    }

    #[test]
    fn test_run_script() {
        let script = AoiScript::from_toml(SCRIPT).expect("Should parse the script");
        let run = script.run().expect("Should run the script");
        let counts: Vec<u64> = run.summaries.iter().map(|summary| summary.raster_count).collect();
        assert_eq!(counts, vec![2000, 1998, 97 * 181 - 1998]);
        assert!(run.manager.aoi().all_points_toggled());
        assert_eq!(
            run.summaries[1].bounding_box,
            BoundingBox::new(20, 70, 69, 109)
        );
    }

    #[test]
    fn test_file_formats() {
        let dir = tempdir().expect("Should create a temp dir");
        let script = AoiScript::from_toml(SCRIPT).expect("Should parse the script");

        let json_path = dir.path().join("script.json");
        script.to_json_file(&json_path).expect("Should write JSON");
        assert_eq!(AoiScript::from_file(&json_path).expect("Should read JSON"), script);

        let toml_path = dir.path().join("script.toml");
        script.to_toml_file(&toml_path).expect("Should write TOML");
        assert_eq!(AoiScript::from_file(&toml_path).expect("Should read TOML"), script);

        let yaml_path = dir.path().join("script.yaml");
        assert!(matches!(
            AoiScript::from_file(&yaml_path),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_script_starting_from_document() {
        let dir = tempdir().expect("Should create a temp dir");
        let input = dir.path().join("start.json");
        let mut start = AoiElement::new("start");
        start.add_point(PixelLocation::new(5, 5));
        start.save_json(&input).expect("Should save the document");

        let script = AoiScript {
            name: "continued".to_owned(),
            raster: RasterSection { rows: 10, columns: 10 },
            input: Some(input),
            commands: vec![AoiCommand::AddPoints { points: vec![PixelLocation::new(6, 5)] }],
        };
        let run = script.run().expect("Should run the script");
        assert_eq!(run.manager.aoi().name(), "continued");
        assert_eq!(run.summaries[0].count, 2);
    }
}
