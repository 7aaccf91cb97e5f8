//! Post-mortem captures written when a run dies.
use std::path::{Path, PathBuf};

use chrono::Local;
use engine_logging::{engine_info, engine_warn};
use serde::Serialize;

use crate::device::Device;
use crate::error::BotError;
use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};

/// Files written by one [`capture`]. Parts the device could not deliver are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub screenshot: Option<PathBuf>,
    pub view_tree: Option<PathBuf>,
    pub manifest: PathBuf,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    captured_at: String,
    error: String,
    fatal: bool,
    screenshot: Option<&'a Path>,
    view_tree: Option<&'a Path>,
}

/// Stem shared by all files of one capture, e.g. `2024-03-01_-_13_05_09-123456789`.
pub fn capture_stem() -> String {
    Local::now().format("%Y-%m-%d_-_%H_%M_%S-%f").to_string()
}

/// Writes a screenshot, the view tree and a JSON manifest describing `error`.
pub fn capture<D: Device + ?Sized>(
    device: &D,
    dir: &Path,
    error: &BotError,
) -> Result<Capture, PersistError> {
    capture_as(device, dir, error, &capture_stem())
}

fn capture_as<D: Device + ?Sized>(
    device: &D,
    dir: &Path,
    error: &BotError,
    stem: &str,
) -> Result<Capture, PersistError> {
    ensure_output_dir(dir)?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());

    let screenshot_path = dir.join(format!("{stem}.jpg"));
    let screenshot = match device.screenshot(&screenshot_path) {
        Ok(()) => Some(screenshot_path),
        Err(err) => {
            engine_warn!("screenshot failed: {err}");
            None
        }
    };

    let view_tree = match device.dump_view_tree() {
        Ok(tree) => Some(writer.write(&format!("{stem}.xml"), tree)?),
        Err(err) => {
            engine_warn!("view tree dump failed: {err}");
            None
        }
    };

    let manifest = Manifest {
        captured_at: Local::now().to_rfc3339(),
        error: error.to_string(),
        fatal: error.is_fatal(),
        screenshot: screenshot.as_deref(),
        view_tree: view_tree.as_deref(),
    };
    let manifest = writer.write(
        &format!("{stem}.json"),
        serde_json::to_vec_pretty(&manifest)?,
    )?;
    engine_info!("diagnostics written to {}", manifest.display());

    Ok(Capture {
        screenshot,
        view_tree,
        manifest,
    })
}
