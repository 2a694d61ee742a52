//! Extract-class.
//!
//! Moves the named fields and methods of a source class into a new class
//! appended after the compilation unit that declares the source class.
//! Moved methods travel as verbatim token text; moved fields are redeclared
//! without their initializer. The moved-member name lists are trusted: a
//! name with no syntactic match is skipped with a diagnostic, not an error.

use std::collections::{BTreeMap, BTreeSet};

use javelin_core::FileId;
use javelin_model::build_program;
use javelin_parse::SourceSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::edit::{EditError, Rewriter};
use crate::members::remove_field_declarator;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractClassParams {
    pub source_class: String,
    pub new_class: String,
    #[serde(default)]
    pub moved_fields: BTreeSet<String>,
    #[serde(default)]
    pub moved_methods: BTreeSet<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractClassError {
    #[error("source class name must not be empty")]
    MissingSourceClass,
    #[error("new class name must not be empty")]
    MissingNewClass,
    #[error("class `{0}` not found")]
    ClassNotFound(String),
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Perform the extraction, returning the rewritten text of every file.
///
/// Edits are applied in the same pass that detects the moved members; there
/// is no cross-file legality gate before them, so no rollback exists once a
/// member has been queued.
pub fn extract_class(
    sources: &SourceSet,
    params: &ExtractClassParams,
) -> Result<BTreeMap<FileId, String>, ExtractClassError> {
    if params.source_class.is_empty() {
        return Err(ExtractClassError::MissingSourceClass);
    }
    if params.new_class.is_empty() {
        return Err(ExtractClassError::MissingNewClass);
    }

    let program = build_program(sources.iter());
    let class = program
        .find_class(&params.source_class)
        .ok_or_else(|| ExtractClassError::ClassNotFound(params.source_class.clone()))?;
    let sf = sources
        .get(&class.file)
        .ok_or_else(|| EditError::UnknownFile(class.file.clone()))?;

    let mut rewriter = Rewriter::new();
    let mut body = String::new();

    for name in &params.moved_fields {
        let Some(field) = class.field(name) else {
            tracing::info!(class = %class.name, field = %name, "field not found in source class; skipping");
            continue;
        };
        let modifier = field
            .modifiers
            .first()
            .map(|m| m.text.as_str())
            .unwrap_or("");
        if modifier.is_empty() {
            body.push_str(&format!("\t{} {};\n", field.datatype, field.name));
        } else {
            body.push_str(&format!("\t{} {} {};\n", modifier, field.datatype, field.name));
        }
        remove_field_declarator(&mut rewriter, sf, field);
    }

    for name in &params.moved_methods {
        let Some(method) = class.method(name) else {
            tracing::info!(class = %class.name, method = %name, "method not found in source class; skipping");
            continue;
        };
        for decl in &method.decls {
            body.push_str(&format!("\n\t{}\n", sf.token_text(*decl)));
            rewriter.delete(&sf.file, *decl);
        }
    }

    let new_class = format!("\n\nclass {}\n{{\n{}}}", params.new_class, body);
    if let Some(last) = sf.tokens.len().checked_sub(1) {
        rewriter.insert_after(&sf.file, last, new_class);
    }

    Ok(rewriter.apply(sources.iter())?)
}
