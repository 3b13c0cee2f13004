//! Source text normalization
//!
//! Every file is reduced to a single whitespace-normalized line before
//! chunking. Markup sources additionally lose script/style blocks and tags.

use std::path::Path;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// How a source file's raw content should be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// HTML-like content: strip script/style blocks and tags first
    Markup,
    /// Plain text or markdown: whitespace normalization only
    Plain,
}

impl SourceFormat {
    /// Map a file extension to its format. Returns `None` for files the
    /// corpus loader should skip entirely.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Markup),
            "txt" | "md" => Some(Self::Plain),
            _ => None,
        }
    }

    /// Format for a path, keyed on its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"<script.*?>.*?</script>")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("script regex")
    })
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"<style.*?>.*?</style>")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("style regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag regex"))
}

/// Normalize raw file content for indexing.
///
/// The output is a single line with whitespace runs collapsed to one
/// space. Empty output signals "skip this file" to the corpus loader.
pub fn normalize(raw: &str, format: SourceFormat) -> String {
    match format {
        SourceFormat::Markup => strip_markup(raw),
        SourceFormat::Plain => collapse_whitespace(raw),
    }
}

/// Remove script/style blocks and tags, then collapse whitespace.
fn strip_markup(raw: &str) -> String {
    let text = script_re().replace_all(raw, " ");
    let text = style_re().replace_all(&text, " ");
    let text = tag_re().replace_all(&text, " ");
    collapse_whitespace(&text)
}

/// Collapse all whitespace runs (including newlines) to single spaces.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_run = true;
        } else {
            if in_run && !out.is_empty() {
                out.push(' ');
            }
            in_run = false;
            out.push(ch);
        }
    }
    out
}
