use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let condensed = condense_whitespace(text);
    if condensed.chars().count() <= max_chars {
        return condensed;
    }

    let truncated = condensed.chars().take(max_chars).collect::<String>();
    format!("{truncated}…")
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{condense_whitespace, preview, sha256_hex};

    #[test]
    fn condense_whitespace_collapses_runs_and_trims() {
        assert_eq!(
            condense_whitespace("  Pacient \t musí\n\nvyplnit "),
            "Pacient musí vyplnit"
        );
    }

    #[test]
    fn preview_truncates_long_text_on_char_boundaries() {
        assert_eq!(preview("krátký text", 60), "krátký text");

        let long = "ž".repeat(80);
        let truncated = preview(&long, 60);
        assert_eq!(truncated.chars().count(), 61);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn sha256_hex_is_stable() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
