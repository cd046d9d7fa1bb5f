use std::fs;

use anyhow::{Context, Result};

/// Reads a line-delimited list of page URLs.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_url_list(path: &str) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read URL file {}", path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
