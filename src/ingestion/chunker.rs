//! Sliding-window text chunking and content-addressed chunk identity

use sha2::{Digest, Sha256};

/// Split normalized text into overlapping fixed-size windows.
///
/// Windows are measured in characters, not bytes, so multi-byte sequences
/// are never split. If `overlap >= chunk_size` the overlap is clamped to
/// `chunk_size / 4` so the window always advances. Each emitted chunk is
/// trimmed and non-empty; empty input produces no chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let clean = text.trim();
    if clean.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let overlap = if overlap >= chunk_size {
        chunk_size / 4
    } else {
        overlap
    };
    let step = (chunk_size - overlap).max(1);

    let chars: Vec<char> = clean.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let part: String = chars[start..end].iter().collect();
        let part = part.trim();
        if !part.is_empty() {
            chunks.push(part.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

/// Derive a stable content-addressed id for a chunk.
///
/// Pure function of (source path, 1-based chunk index, chunk text): the
/// same inputs always produce the same id, which makes re-indexing an
/// upsert rather than a duplication. The digest is truncated to 16 hex
/// characters; accepted collision risk at this corpus scale.
pub fn chunk_id(source: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b":");
    hasher.update(index.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(text.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("chunk_{}", &digest[..16])
}
