//! Decoding of xz-compressed JSON metadata files
//!
//! Each Instaloader metadata file holds one JSON document compressed with xz.
//! The whole file is decompressed into memory, decoded as UTF-8 and parsed
//! into a [`serde_json::Value`].
//!
//! # Examples
//!
//! ```no_run
//! use postmeta_ingest::decoder::decode_file;
//! use std::path::Path;
//!
//! let document = decode_file(Path::new("data/raw/2021-01-01_00-00-00_UTC.json.xz"))?;
//! assert!(document.get("node").is_some());
//! # Ok::<(), postmeta_ingest::IngestError>(())
//! ```

use crate::error::{IngestError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use xz2::read::XzDecoder;

/// Decode a single `*.json.xz` file
///
/// The file handle and decompression stream live only for this call.
pub fn decode_file(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| IngestError::filesystem(path, e))?;
    let document = decode_reader(BufReader::new(file))?;
    debug!(path = %path.display(), "Decoded document");
    Ok(document)
}

/// Decode xz-compressed JSON held in memory
pub fn decode_bytes(data: &[u8]) -> Result<Value> {
    decode_reader(data)
}

fn decode_reader<R: Read>(reader: R) -> Result<Value> {
    // Concatenated xz streams are accepted, like `lzma.open`.
    let mut decoder = XzDecoder::new_multi_decoder(reader);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| IngestError::Parse(format!("Failed to decompress xz data: {}", e)))?;

    let text = String::from_utf8(decompressed)
        .map_err(|e| IngestError::Parse(format!("Decompressed data is not valid UTF-8: {}", e)))?;

    serde_json::from_str(&text)
        .map_err(|e| IngestError::Parse(format!("Invalid JSON document: {}", e)))
}
