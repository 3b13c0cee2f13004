//! Corpus loading: walk a directory tree into a flat list of chunk records

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::chunker::{chunk_id, chunk_text};
use super::normalize::{normalize, SourceFormat};
use crate::error::Result;

/// One indexed chunk of a source document.
///
/// `chunk_id` is a deterministic function of (source, position, text), so
/// loading the same corpus twice yields byte-identical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Content-addressed identifier
    pub chunk_id: String,
    /// Chunk text
    pub text: String,
    /// Source file path, relative to the corpus root
    pub source: String,
}

/// Load a corpus directory into chunk records.
///
/// Visits regular files in sorted order, accepting `.txt`, `.md`, `.html`
/// and `.htm`. Files are decoded leniently (invalid UTF-8 bytes dropped),
/// normalized per their format, and skipped when they normalize to empty.
/// A missing directory yields an empty list rather than an error.
pub fn load_corpus_chunks<P: AsRef<Path>>(
    corpus_dir: P,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<ChunkRecord>> {
    let base = corpus_dir.as_ref();
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();

    for entry in WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Some(format) = SourceFormat::from_path(path) else {
            continue;
        };

        let raw = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        let normalized = normalize(&raw, format);
        if normalized.is_empty() {
            tracing::debug!("skipping empty file {}", path.display());
            continue;
        }

        let source = path
            .strip_prefix(base)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        for (idx, part) in chunk_text(&normalized, chunk_size, overlap)
            .into_iter()
            .enumerate()
        {
            let index = idx + 1;
            records.push(ChunkRecord {
                chunk_id: chunk_id(&source, index, &part),
                text: part,
                source: source.clone(),
            });
        }
    }

    Ok(records)
}
