use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::JobError;

/// Scratch folder a single input image is copied into.
pub const GUI_INPUT_DIR: &str = "_gui_input";
pub const FINAL_OUTPUT_DIR: &str = "final_output";
/// Per-stage output folders, recreated empty before every run.
pub const STAGE_DIRS: [&str; 4] = [
    "stage_1_restore_output",
    "stage_2_detection_output",
    "stage_3_face_output",
    FINAL_OUTPUT_DIR,
];

/// Resolves the output folder against `root` and makes sure it exists.
pub fn resolve_output_folder(
    root: &Path,
    requested: Option<&str>,
    default_dir: &str,
) -> Result<PathBuf, JobError> {
    let folder = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(folder) => {
            let path = PathBuf::from(folder);
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        }
        None => root.join(default_dir),
    };
    fs::create_dir_all(&folder)
        .map_err(|e| JobError::io("Failed to create output folder", e))?;
    Ok(folder)
}

/// Copies a single image into a fresh `_gui_input` folder under `output_folder`.
pub fn prepare_single_image_folder(
    input_path: &Path,
    output_folder: &Path,
) -> Result<PathBuf, JobError> {
    let input_dir = output_folder.join(GUI_INPUT_DIR);
    if input_dir.exists() {
        fs::remove_dir_all(&input_dir)
            .map_err(|e| JobError::io(format!("Failed to clear {GUI_INPUT_DIR}"), e))?;
    }
    fs::create_dir_all(&input_dir)
        .map_err(|e| JobError::io(format!("Failed to create {GUI_INPUT_DIR}"), e))?;

    let file_name = input_path
        .file_name()
        .ok_or_else(|| JobError::InvalidInput(input_path.to_path_buf()))?;
    fs::copy(input_path, input_dir.join(file_name))
        .map_err(|e| JobError::io("Failed to copy input file", e))?;
    Ok(input_dir)
}

pub fn reset_stage_dirs(output_folder: &Path) -> Result<(), JobError> {
    for name in STAGE_DIRS {
        let dir = output_folder.join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|e| JobError::io(format!("Failed to clear {}", dir.display()), e))?;
        }
        fs::create_dir_all(&dir)
            .map_err(|e| JobError::io(format!("Failed to create {}", dir.display()), e))?;
    }
    Ok(())
}

/// Most recently modified regular, non-hidden file in `dir`.
pub fn pick_latest_file(dir: &Path) -> Result<Option<PathBuf>, JobError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    let entries = fs::read_dir(dir).map_err(|e| JobError::io("Failed to read dir", e))?;
    for entry in entries {
        let entry = entry.map_err(|e| JobError::io("Failed to read dir entry", e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map_err(|e| JobError::io(format!("Failed to stat file {}", path.display()), e))?;

        match &latest {
            Some((current, _)) if modified <= *current => {}
            _ => latest = Some((modified, path)),
        }
    }

    Ok(latest.map(|(_, path)| path))
}
