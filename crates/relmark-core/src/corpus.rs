//! Corpus input and feature output.
//!
//! Examples are read from a TACRED-style JSON array or from JSON Lines;
//! features are written as JSON Lines.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{Feature, RawExample};

/// Load raw examples from a JSON array file or a JSON Lines file.
pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<RawExample>> {
    let text = fs::read_to_string(path)?;
    parse_examples(&text)
}

/// Parse raw examples; a leading `[` selects the JSON array format.
pub fn parse_examples(text: &str) -> Result<Vec<RawExample>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    let mut examples = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        examples.push(serde_json::from_str(line)?);
    }
    Ok(examples)
}

/// Write one JSON object per feature.
pub fn write_features<W: Write>(writer: W, features: &[Feature]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for feature in features {
        serde_json::to_writer(&mut writer, feature)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_features_file<P: AsRef<Path>>(path: P, features: &[Feature]) -> Result<()> {
    write_features(File::create(path)?, features)
}
