use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use anyhow::{Context, Result};
use log::info;

/// Write an encoded PNG as `waterfall_<unix-seconds>.png` under `dir`.
pub fn save_snapshot(png: &[u8], dir: &Path) -> Result<PathBuf> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before 1970")?
        .as_secs();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("waterfall_{timestamp}.png"));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    w.write_all(png)?;
    w.flush()?;
    info!("snapshot saved: {}", path.display());
    Ok(path)
}
