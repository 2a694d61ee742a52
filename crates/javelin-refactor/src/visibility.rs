//! Decrease-field-visibility.
//!
//! The operation rewrites the named field's declaration so it reads
//! `public`: a declaration without a visibility modifier gains one in front
//! of its type, a `private` or `protected` keyword is replaced, and an
//! already-`public` field is left untouched, so repeated runs converge.

use javelin_model::build_program;
use javelin_parse::SourceFile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::edit::{EditError, Rewriter};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreaseFieldVisibilityParams {
    pub source_class: String,
    pub field_name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisibilityError {
    #[error("source class name must not be empty")]
    MissingSourceClass,
    #[error("field name must not be empty")]
    MissingFieldName,
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Rewrite `source` so the field is `public`.
///
/// A class or field that does not exist in the file is not an error: the
/// text comes back unchanged and a diagnostic records the miss. Only absent
/// required parameters fail, and they fail before any traversal.
pub fn decrease_field_visibility(
    source: &SourceFile,
    params: &DecreaseFieldVisibilityParams,
) -> Result<String, VisibilityError> {
    if params.source_class.is_empty() {
        return Err(VisibilityError::MissingSourceClass);
    }
    if params.field_name.is_empty() {
        return Err(VisibilityError::MissingFieldName);
    }

    let program = build_program([source]);
    let Some(class) = program.find_class(&params.source_class) else {
        tracing::info!(class = %params.source_class, file = %source.file, "class not found; leaving file unchanged");
        return Ok(source.text.clone());
    };
    let Some(field) = class.field(&params.field_name) else {
        tracing::info!(class = %class.name, field = %params.field_name, "field not found; leaving file unchanged");
        return Ok(source.text.clone());
    };

    if field.has_modifier("public") {
        return Ok(source.text.clone());
    }

    let mut rewriter = Rewriter::new();
    let visibility = field
        .modifiers
        .iter()
        .find(|m| matches!(m.text.as_str(), "private" | "protected"));
    match visibility {
        Some(modifier) => rewriter.replace(&source.file, modifier.tokens, "public"),
        None => rewriter.replace(
            &source.file,
            field.type_tokens,
            format!("public {}", field.datatype),
        ),
    }

    let mut out = rewriter.apply([source])?;
    Ok(out
        .remove(&source.file)
        .unwrap_or_else(|| source.text.clone()))
}
