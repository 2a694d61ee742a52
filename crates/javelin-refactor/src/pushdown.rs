//! Pushdown-field.
//!
//! Moves a field from a superclass into its derived classes. Analysis and
//! mutation are strictly separated: `analyze` proves legality across the
//! whole file set first, and only then are edits emitted, so a failure never
//! changes any file.

use std::collections::{BTreeMap, BTreeSet};

use javelin_core::FileId;
use javelin_model::build_program;
use javelin_parse::SourceSet;
use serde::{Deserialize, Serialize};

use crate::analyze::{analyze_pushdown, PushdownError};
use crate::edit::{EditError, Rewriter};
use crate::members::{inherited_visibility, remove_field_declarator};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushdownFieldParams {
    pub package_name: String,
    pub superclass_name: String,
    pub field_name: String,
    /// Derived classes to push into; empty means every derived class.
    #[serde(default)]
    pub target_class_names: BTreeSet<String>,
}

/// Push the field down, returning the rewritten text of every file.
///
/// On `Err` nothing has been computed beyond the analysis; callers that
/// materialize only on `Ok` get the transactional guarantee for free.
pub fn pushdown_field(
    sources: &SourceSet,
    params: &PushdownFieldParams,
) -> Result<BTreeMap<FileId, String>, PushdownError> {
    let program = build_program(sources.iter());
    let plan = analyze_pushdown(
        &program,
        &params.package_name,
        &params.superclass_name,
        &params.field_name,
        &params.target_class_names,
    )?;

    let mut rewriter = Rewriter::new();

    let super_sf = sources
        .get(&plan.superclass.file)
        .ok_or_else(|| EditError::UnknownFile(plan.superclass.file.clone()))?;
    remove_field_declarator(&mut rewriter, super_sf, plan.field);

    let visibility = inherited_visibility(plan.field);
    let initializer = plan
        .field
        .initializer
        .as_ref()
        .map(|init| format!(" = {init}"))
        .unwrap_or_default();
    for target in &plan.targets {
        let declaration = format!(
            "\n    {}{} {}{};",
            visibility, plan.field.datatype, plan.field.name, initializer
        );
        rewriter.insert_after(&target.file, target.body_open_token, declaration);
    }

    Ok(rewriter.apply(sources.iter())?)
}
