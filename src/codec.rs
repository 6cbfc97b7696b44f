//! Reads and writes the textual circuit file format.
//!
//! One operation per line, `#`-prefixed comments and blank lines ignored.
//! The codec only ever touches the operation log; loaded circuits are
//! replayed against a fresh state vector by the caller.

use crate::error::{Result, SimError};
use crate::instructions::{parse_operation, Operation};
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Serialize an operation log to the line format, with a comment header.
pub fn serialize(operations: &[Operation]) -> String {
    let mut out = String::from("# qcsim circuit\n");
    for op in operations {
        out.push_str(&op.encode());
        out.push('\n');
    }
    out
}

/// Parse circuit file text into an ordered operation list.
///
/// Line numbers in errors are 1-based and count every line of the input,
/// comments and blanks included.
pub fn deserialize(text: &str) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op = parse_operation(trimmed).map_err(|e| SimError::InvalidFileFormat {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        operations.push(op);
    }
    Ok(operations)
}

/// Write an operation log to `path`.
pub fn save(path: &Path, operations: &[Operation]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| map_io(path, e))?;
    file.write_all(serialize(operations).as_bytes())?;
    info!("saved {} operation(s) to {}", operations.len(), path.display());
    Ok(())
}

/// Read an operation log from `path`.
pub fn load(path: &Path) -> Result<Vec<Operation>> {
    let text = fs::read_to_string(path).map_err(|e| map_io(path, e))?;
    let operations = deserialize(&text)?;
    info!(
        "loaded {} operation(s) from {}",
        operations.len(),
        path.display()
    );
    Ok(operations)
}

/// Write an operation log as JSON, for consumption by external tooling.
pub fn save_json(path: &Path, operations: &[Operation]) -> Result<()> {
    let file = File::create(path).map_err(|e| map_io(path, e))?;
    serde_json::to_writer_pretty(file, operations)
        .map_err(|e| SimError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    info!(
        "exported {} operation(s) as json to {}",
        operations.len(),
        path.display()
    );
    Ok(())
}

fn map_io(path: &Path, err: std::io::Error) -> SimError {
    if err.kind() == std::io::ErrorKind::NotFound {
        SimError::FileNotFound(path.display().to_string())
    } else {
        SimError::Io(err)
    }
}
