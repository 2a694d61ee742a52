//! The token-range rewrite overlay.
//!
//! Edits are keyed by token index, never by character offset or line. The
//! engine validates that ranges do not overlap, then composes all pending
//! edits in a single deterministic pass over the original text, emitting
//! untouched spans verbatim, original whitespace and comments included.
//! Overlaps are never resolved here; operations must not emit them.

use std::collections::BTreeMap;

use javelin_core::FileId;
use javelin_parse::{SourceFile, TokenRange};
use thiserror::Error;

/// A single pending edit: a half-open token-index range and its replacement.
/// An empty range marks an insertion point at a token boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenEdit {
    pub file: FileId,
    pub tokens: TokenRange,
    pub replacement: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edits refer to unknown file {0:?}")]
    UnknownFile(FileId),
    #[error("token range {range:?} is out of bounds (token count {len}) in {file:?}")]
    OutOfBounds {
        file: FileId,
        range: TokenRange,
        len: usize,
    },
    #[error("overlapping edits in {file:?}: {first:?} overlaps {second:?}")]
    OverlappingEdits {
        file: FileId,
        first: TokenRange,
        second: TokenRange,
    },
}

/// Pending edit overlay for one refactoring invocation.
#[derive(Debug, Default)]
pub struct Rewriter {
    edits: Vec<TokenEdit>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, file: &FileId, tokens: TokenRange, text: impl Into<String>) {
        self.edits.push(TokenEdit {
            file: file.clone(),
            tokens,
            replacement: text.into(),
        });
    }

    pub fn delete(&mut self, file: &FileId, tokens: TokenRange) {
        self.replace(file, tokens, "");
    }

    /// Insert `text` immediately after token `token`, before any trivia that
    /// follows it.
    pub fn insert_after(&mut self, file: &FileId, token: usize, text: impl Into<String>) {
        self.replace(file, TokenRange::empty_at(token + 1), text);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Compose all pending edits over `sources`.
    ///
    /// Every supplied file appears in the result; files without edits pass
    /// through byte-identical. Fails without partial output when an edit
    /// refers to a file outside `sources`, runs past the token count, or
    /// overlaps another edit.
    pub fn apply<'a>(
        &self,
        sources: impl IntoIterator<Item = &'a SourceFile>,
    ) -> Result<BTreeMap<FileId, String>, EditError> {
        let mut by_file: BTreeMap<FileId, Vec<TokenEdit>> = BTreeMap::new();
        for edit in &self.edits {
            by_file
                .entry(edit.file.clone())
                .or_default()
                .push(edit.clone());
        }

        let mut out = BTreeMap::new();
        for sf in sources {
            let edits = by_file.remove(&sf.file).unwrap_or_default();
            out.insert(sf.file.clone(), compose(sf, edits)?);
        }
        if let Some(file) = by_file.into_keys().next() {
            return Err(EditError::UnknownFile(file));
        }
        Ok(out)
    }
}

/// Normalize one file's edits (sort, dedupe, merge same-point insertions,
/// reject overlap) and build the final text in one pass: a concatenation of
/// untouched spans and replacements, in token-index order.
fn compose(sf: &SourceFile, mut edits: Vec<TokenEdit>) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(sf.text.clone());
    }

    let len = sf.tokens.len();
    for edit in &edits {
        if edit.tokens.end > len || edit.tokens.start > len {
            return Err(EditError::OutOfBounds {
                file: sf.file.clone(),
                range: edit.tokens,
                len,
            });
        }
    }

    edits.sort_by(|a, b| {
        a.tokens
            .start
            .cmp(&b.tokens.start)
            .then_with(|| a.tokens.end.cmp(&b.tokens.end))
            .then_with(|| a.replacement.cmp(&b.replacement))
    });

    // Exact duplicates are redundant.
    edits.dedup();

    // Merge multiple insertions at the same boundary; identical non-empty
    // ranges with different replacements are a conflict.
    let mut merged: Vec<TokenEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(last) = merged.last_mut() {
            if last.tokens == edit.tokens && last.tokens.is_empty() {
                last.replacement.push_str(&edit.replacement);
                continue;
            }
            if last.tokens == edit.tokens && last.replacement != edit.replacement {
                return Err(EditError::OverlappingEdits {
                    file: sf.file.clone(),
                    first: last.tokens,
                    second: edit.tokens,
                });
            }
        }
        merged.push(edit);
    }

    let mut prev: Option<TokenRange> = None;
    for edit in &merged {
        if let Some(prev_range) = prev {
            if edit.tokens.start < prev_range.end {
                return Err(EditError::OverlappingEdits {
                    file: sf.file.clone(),
                    first: prev_range,
                    second: edit.tokens,
                });
            }
        }
        prev = Some(edit.tokens);
    }

    let text = &sf.text;
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for edit in &merged {
        let (start, end) = if edit.tokens.is_empty() {
            let at = sf.tokens.insertion_offset(edit.tokens.start, text.len());
            (at, at)
        } else {
            let span = sf.tokens.span(edit.tokens).ok_or(EditError::OutOfBounds {
                file: sf.file.clone(),
                range: edit.tokens,
                len,
            })?;
            (span.start, span.end)
        };
        result.push_str(&text[cursor..start]);
        result.push_str(&edit.replacement);
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    Ok(result)
}
