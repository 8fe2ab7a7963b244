//! Model artifact on disk.
//!
//! Layout, little endian:
//!
//! ```text
//! [0..4)   magic "D2VM"
//! [4..8)   format version (u32)
//! [8..12)  CRC32 of the payload (u32)
//! [12..20) payload length (u64)
//! [20..)   bincode-encoded Doc2Vec
//! ```

use super::doc2vec::Doc2Vec;
use super::{EmbeddingError, Result};
use crc32fast::Hasher as Crc32;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const MAGIC: &[u8; 4] = b"D2VM";
const FORMAT_VERSION: u32 = 2;
const HEADER_SIZE: usize = 20;

fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(payload);
    hasher.finalize()
}

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&checksum(payload).to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

impl Doc2Vec {
    /// Write the whole model in one go. An existing file is replaced.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let persistence = |reason: String| EmbeddingError::Persistence {
            path: path.display().to_string(),
            reason,
        };

        let payload = bincode::serialize(self).map_err(|e| persistence(e.to_string()))?;

        let buf = frame(&payload);
        fs::write(path, &buf).map_err(|e| persistence(e.to_string()))?;
        debug!(path = %path.display(), bytes = buf.len(), "model written");
        Ok(())
    }

    /// Read a model back, verifying header, checksum and matrix shapes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let corrupt = |reason: String| EmbeddingError::Corrupt {
            path: path_str.clone(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => EmbeddingError::ModelNotFound { path: path_str.clone() },
            _ => EmbeddingError::Persistence {
                path: path_str.clone(),
                reason: e.to_string(),
            },
        })?;

        if bytes.len() < HEADER_SIZE {
            return Err(corrupt(format!("{} bytes is shorter than the header", bytes.len())));
        }
        let (header, payload) = bytes.split_at(HEADER_SIZE);
        if &header[0..4] != MAGIC {
            return Err(corrupt("bad magic".to_string()));
        }

        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if version != FORMAT_VERSION {
            return Err(corrupt(format!("unsupported format version {}", version)));
        }
        let expected_crc = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&header[12..20]);
        let expected_len = u64::from_le_bytes(len_bytes);

        if payload.len() as u64 != expected_len {
            return Err(corrupt(format!(
                "payload is {} bytes, header says {}",
                payload.len(),
                expected_len
            )));
        }
        if checksum(payload) != expected_crc {
            return Err(corrupt("checksum mismatch".to_string()));
        }

        let model: Doc2Vec = bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))?;
        model.check_shapes().map_err(corrupt)?;
        model.config().validate().map_err(|e| corrupt(e.to_string()))?;

        debug!(path = %path.display(), docs = model.doc_count(), "model loaded");
        Ok(model)
    }
}
