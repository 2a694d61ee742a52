//! Pushdown legality analysis.
//!
//! Every check runs before a single edit is emitted, and one violation
//! anywhere in the program fails the whole operation, so a failed pushdown
//! leaves every file byte-identical.
//!
//! Resolution here is deliberately approximate: a declared type matches the
//! superclass (or a non-target derived class) when its literal text matches
//! the simple name and the consuming file imports it, or when it matches the
//! package-qualified spelling outright. No type inference happens.

use std::collections::BTreeSet;

use javelin_model::{BodyItem, Class, Field, Program};
use thiserror::Error;

use crate::edit::EditError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PushdownError {
    #[error("package `{0}` not found")]
    PackageNotFound(String),
    #[error("class `{class}` not found in package `{package}`")]
    ClassNotFound { package: String, class: String },
    #[error("field `{field}` not found in class `{class}`")]
    FieldNotFound { class: String, field: String },
    #[error("field `{field}` is already declared in `{class}`")]
    NameCollision { class: String, field: String },
    #[error("field `{field}` is reachable as `{path}` inside `{class}`")]
    UsageViolation {
        class: String,
        field: String,
        path: String,
    },
    #[error(transparent)]
    Edit(#[from] EditError),
}

pub(crate) struct PushdownPlan<'a> {
    pub superclass: &'a Class,
    pub field: &'a Field,
    pub targets: Vec<&'a Class>,
}

pub(crate) fn analyze_pushdown<'a>(
    program: &'a Program,
    package_name: &str,
    superclass_name: &str,
    field_name: &str,
    target_class_names: &BTreeSet<String>,
) -> Result<PushdownPlan<'a>, PushdownError> {
    let package = program
        .package(package_name)
        .ok_or_else(|| PushdownError::PackageNotFound(package_name.to_string()))?;
    let superclass = package
        .classes
        .get(superclass_name)
        .ok_or_else(|| PushdownError::ClassNotFound {
            package: package_name.to_string(),
            class: superclass_name.to_string(),
        })?;
    let field = superclass
        .field(field_name)
        .ok_or_else(|| PushdownError::FieldNotFound {
            class: superclass_name.to_string(),
            field: field_name.to_string(),
        })?;

    let qualified = format!("{package_name}.{superclass_name}");

    // Partition derived classes into targets and the rest.
    let mut targets = Vec::new();
    let mut others = Vec::new();
    for class in program.classes() {
        if !extends_superclass(class, package_name, superclass_name, &qualified) {
            continue;
        }
        if target_class_names.is_empty() || target_class_names.contains(&class.name) {
            if class.fields.contains_key(field_name) {
                return Err(PushdownError::NameCollision {
                    class: class.name.clone(),
                    field: field_name.to_string(),
                });
            }
            targets.push(class);
        } else {
            others.push(class);
        }
    }

    // The field must stay unreachable through anything statically typed as
    // the superclass or a non-target derived class, anywhere in the program.
    for class in program.classes() {
        scan_class_usages(
            class,
            package_name,
            superclass_name,
            &qualified,
            field_name,
            &others,
        )?;
    }

    Ok(PushdownPlan {
        superclass,
        field,
        targets,
    })
}

/// Does `class` extend the superclass, as written? Matches the simple name
/// when this class's own file can see the superclass unqualified, or the
/// package-qualified spelling literally.
fn extends_superclass(
    class: &Class,
    package_name: &str,
    superclass_name: &str,
    qualified: &str,
) -> bool {
    match class.superclass_name.as_deref() {
        Some(written) => {
            (written == superclass_name && class.file_info.sees_class(package_name, superclass_name))
                || written == qualified
        }
        None => false,
    }
}

fn scan_class_usages(
    class: &Class,
    package_name: &str,
    superclass_name: &str,
    qualified: &str,
    field_name: &str,
    others: &[&Class],
) -> Result<(), PushdownError> {
    let sees_superclass = class.file_info.sees_class(package_name, superclass_name);
    let disallowed = |datatype: &str| -> bool {
        (sees_superclass && datatype == superclass_name)
            || datatype == qualified
            || others.iter().any(|other| {
                (class.file_info.sees_class(&other.package_name, &other.name)
                    && datatype == other.name)
                    || datatype == format!("{}.{}", other.package_name, other.name)
            })
    };

    let field_names: BTreeSet<&str> = class
        .fields
        .values()
        .filter(|f| disallowed(&f.datatype))
        .map(|f| f.name.as_str())
        .collect();

    for method in class.methods.values() {
        // Locals accumulate in scan order; a use before its declaration in
        // that order is not attributed to the local.
        let mut locals: BTreeSet<&str> = BTreeSet::new();
        for item in &method.body {
            match item {
                BodyItem::Local(local) => {
                    if disallowed(&local.datatype) {
                        locals.insert(local.identifier.as_str());
                    }
                }
                BodyItem::Name(name) => {
                    let segments = &name.segments;
                    if segments.last().map(String::as_str) != Some(field_name) {
                        continue;
                    }
                    let n = segments.len();
                    let two = n == 2;
                    let three = n == 3 && segments[0] == "this";
                    if !(two || three) {
                        continue;
                    }
                    let var = segments[n - 2].as_str();
                    if (two && locals.contains(var)) || field_names.contains(var) {
                        return Err(PushdownError::UsageViolation {
                            class: class.name.clone(),
                            field: field_name.to_string(),
                            path: name.dotted(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
