//! Structural refactoring operations for Java source.
//!
//! Three operations built on a shared token-range rewrite engine and the
//! javelin program model:
//! - decrease-field-visibility (`decrease_field_visibility`)
//! - extract-class (`extract_class`)
//! - pushdown-field (`pushdown_field`)
//!
//! Pushdown-field proves legality across the whole file set before touching
//! anything; the other two edit in the same pass that finds their targets
//! and offer no rollback. That asymmetry is part of the contract.

mod analyze;
mod edit;
mod extract_class;
mod materialize;
mod members;
mod pushdown;
mod visibility;

pub use analyze::PushdownError;
pub use edit::{EditError, Rewriter, TokenEdit};
pub use extract_class::{extract_class, ExtractClassError, ExtractClassParams};
pub use materialize::{write_changes, MaterializeError, PathMapping};
pub use pushdown::{pushdown_field, PushdownFieldParams};
pub use visibility::{
    decrease_field_visibility, DecreaseFieldVisibilityParams, VisibilityError,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use javelin_core::FileId;
use javelin_parse::{IngestError, SourceFile, SourceSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefactorError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
    #[error(transparent)]
    ExtractClass(#[from] ExtractClassError),
    #[error(transparent)]
    Pushdown(#[from] PushdownError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Load `path`, widen the field to `public`, and write the result back in
/// place.
pub fn run_decrease_field_visibility(
    path: &Path,
    params: &DecreaseFieldVisibilityParams,
) -> Result<(), RefactorError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = SourceFile::parse(FileId::new(path.to_string_lossy()), text)?;
    let rewritten = decrease_field_visibility(&source, params)?;
    let changes = BTreeMap::from([(source.file.clone(), rewritten)]);
    write_changes(&changes, &PathMapping::InPlace)?;
    Ok(())
}

/// Load the file set, extract the new class, and write every file back in
/// place.
pub fn run_extract_class(
    paths: &[PathBuf],
    params: &ExtractClassParams,
) -> Result<(), RefactorError> {
    let sources = SourceSet::load(paths)?;
    let changes = extract_class(&sources, params)?;
    write_changes(&changes, &PathMapping::InPlace)?;
    Ok(())
}

/// Load the file set, push the field down, and write every file through
/// `mapping`. On any legality failure nothing is written at all: every input
/// file stays byte-identical.
pub fn run_pushdown_field(
    paths: &[PathBuf],
    params: &PushdownFieldParams,
    mapping: &PathMapping,
) -> Result<(), RefactorError> {
    let sources = SourceSet::load(paths)?;
    let changes = pushdown_field(&sources, params)?;
    write_changes(&changes, mapping)?;
    Ok(())
}
