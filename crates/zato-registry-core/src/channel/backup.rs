//! Backup file format
//!
//! A backup is a JSON array of raw records, UTF-8, indented with four
//! spaces, keys sorted, ending with a newline.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{RegistryError, Result};

use super::types::ChannelRecord;

/// Write `records` to `path`, replacing any existing file
pub fn write_backup(path: &Path, records: &[ChannelRecord]) -> Result<()> {
    let sorted: Vec<BTreeMap<&str, &Value>> = records
        .iter()
        .map(|record| {
            record
                .as_map()
                .iter()
                .map(|(key, value)| (key.as_str(), value))
                .collect()
        })
        .collect();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    sorted.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a backup written by [`write_backup`] (or by hand)
pub fn read_backup(path: &Path) -> Result<Vec<ChannelRecord>> {
    let file = File::open(path)?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| RegistryError::InvalidBackup {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let Value::Array(items) = value else {
        return Err(RegistryError::InvalidBackup {
            path: path.to_path_buf(),
            message: "expected a JSON array of channels".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            ChannelRecord::try_from(item).map_err(|_| RegistryError::InvalidBackup {
                path: path.to_path_buf(),
                message: format!("entry {} is not a JSON object", idx),
            })
        })
        .collect()
}
