//! Load snapshots from JSON documents

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::Snapshot;
use crate::error::LoadError;

/// Load a snapshot from a JSON file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, LoadError> {
    let file = File::open(path)?;
    load_snapshot_from_reader(BufReader::new(file))
}

/// Load a snapshot from any reader (e.g., string buffer, network stream)
pub fn load_snapshot_from_reader<R: Read>(reader: R) -> Result<Snapshot, LoadError> {
    let snapshot = serde_json::from_reader(reader)?;
    Ok(snapshot)
}
