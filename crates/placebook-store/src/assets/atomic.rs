//! Atomic write primitive
//!
//! temp -> rename, so a reader never sees a half-written image

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;

/// Atomically write bytes to `target_path`, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_asset_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| io_error("write_asset_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_asset_temp", e));
    }

    Ok(())
}
