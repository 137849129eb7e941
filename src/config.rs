use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::ExportScale;

pub const SETTINGS_FILE: &str = "box_picker.toml";

/// User settings kept between sessions. Scale factors are stored as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub sheet_url: String,
    pub batch_name: String,
    pub scale_x: String,
    pub scale_y: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            sheet_url: "".to_string(),
            batch_name: "".to_string(),
            scale_x: "1.0".to_string(),
            scale_y: "1.0".to_string(),
        }
    }
}

impl AppSettings {
    pub fn export_scale(&self) -> ExportScale {
        ExportScale::parse(&self.scale_x, &self.scale_y)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        let settings = toml::from_str(&s).context("Failed to parse settings")?;
        Ok(settings)
    }

    /// Missing file gives defaults silently; a broken one gives defaults and a warning.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read_from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = toml::to_string_pretty(self).context("Failed to serialize AppSettings to TOML")?;
        std::fs::write(path, s)?;
        Ok(())
    }
}
