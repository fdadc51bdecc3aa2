use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use panel_logging::{panel_info, panel_warn};
use restore_core::JobOptions;
use restore_engine::EngineSettings;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const SETTINGS_FILENAME: &str = ".restore_panel.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Panel defaults, stored as RON next to where the panel is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Folder holding `run.py`. Defaults to the working directory.
    pub project_root: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub gpu: String,
    pub python: String,
    pub with_scratch: bool,
    pub hr: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        let options = JobOptions::default();
        Self {
            project_root: None,
            output_folder: options.output_folder,
            gpu: options.gpu,
            python: options.python_executable,
            with_scratch: options.with_scratch,
            hr: options.hr,
        }
    }
}

impl PanelSettings {
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            output_folder: self.output_folder.clone(),
            gpu: self.gpu.clone(),
            with_scratch: self.with_scratch,
            hr: self.hr,
            python_executable: self.python.clone(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let root = self
            .project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        EngineSettings::with_root(root)
    }
}

/// Missing file means defaults; unreadable or malformed files are logged and ignored.
pub fn load_settings(path: &Path) -> PanelSettings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PanelSettings::default();
        }
        Err(err) => {
            panel_warn!("Failed to read settings from {:?}: {}", path, err);
            return PanelSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            panel_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            panel_warn!("Failed to parse settings from {:?}: {}", path, err);
            PanelSettings::default()
        }
    }
}

/// Writes through a temp file in the same folder, then renames over the target.
pub fn save_settings(path: &Path, settings: &PanelSettings) -> Result<(), SettingsError> {
    let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| SettingsError::Io(e.error))?;
    panel_info!("Saved settings to {:?}", path);
    Ok(())
}
