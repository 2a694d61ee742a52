//! Two-pass program model builder.
//!
//! Pass 1 indexes every class declaration boundary in a file; pass 2 walks
//! the member declarations and attributes each one to the innermost class
//! whose body contains it. Attribution is by token-range containment, so
//! nested or unrelated classes in the same file are never confused, and no
//! mutable "currently inside class X" traversal state exists.

use std::collections::BTreeMap;

use javelin_parse::{
    find_named_child, modifier_node, node_text, visit_nodes, SourceFile, TokenRange,
};
use tree_sitter::Node;

use crate::{
    BodyItem, Class, ExpressionName, Field, FileInfo, LocalVariable, Method, Modifier, Package,
    Program,
};

/// Build the program model for a file set.
///
/// The model is complete or absent: ingestion has already rejected files that
/// fail to parse, so every entity recorded here comes from a fully parsed
/// tree.
pub fn build_program<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Program {
    let mut program = Program::default();
    for sf in files {
        let file_info = read_file_info(sf);
        let package_name = file_info.package_name.clone().unwrap_or_default();
        for class in file_classes(sf, &file_info, &package_name) {
            let package = program
                .packages
                .entry(package_name.clone())
                .or_insert_with(|| Package {
                    name: package_name.clone(),
                    classes: BTreeMap::new(),
                });
            let name = class.name.clone();
            if package.classes.insert(name.clone(), class).is_some() {
                tracing::warn!(class = %name, package = %package_name, "duplicate class declaration; keeping the later one");
            }
        }
    }
    program
}

fn read_file_info(sf: &SourceFile) -> FileInfo {
    let root = sf.tree.root_node();
    let mut info = FileInfo::new(package_name_of(root, &sf.text));
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut is_static = false;
        let mut on_demand = false;
        let mut name = None;
        let mut parts = child.walk();
        for part in child.children(&mut parts) {
            match part.kind() {
                "static" => is_static = true,
                "asterisk" => on_demand = true,
                "identifier" | "scoped_identifier" => name = Some(node_text(&sf.text, part)),
                _ => {}
            }
        }
        // A static member import never makes a type visible by simple name.
        if is_static {
            continue;
        }
        if let Some(name) = name {
            info.add_import(name, on_demand);
        }
    }
    info
}

fn package_name_of(root: Node<'_>, source: &str) -> Option<String> {
    let decl = find_named_child(root, "package_declaration")?;
    let mut cursor = decl.walk();
    let result = decl
        .named_children(&mut cursor)
        .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
        .map(|n| node_text(source, n).to_string());
    result
}

fn file_classes(sf: &SourceFile, file_info: &FileInfo, package_name: &str) -> Vec<Class> {
    // Pass 1: class declaration boundaries.
    let mut shells: Vec<(TokenRange, Class)> = Vec::new();
    visit_nodes(sf.tree.root_node(), &mut |node| {
        if node.kind() != "class_declaration" {
            return;
        }
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let body_tokens = sf.tokens.range_of(body);
        shells.push((
            body_tokens,
            Class {
                name: node_text(&sf.text, name_node).to_string(),
                package_name: package_name.to_string(),
                superclass_name: superclass_name_of(node, &sf.text),
                fields: BTreeMap::new(),
                methods: BTreeMap::new(),
                file: sf.file.clone(),
                file_info: file_info.clone(),
                tokens: sf.tokens.range_of(node),
                body_open_token: body_tokens.start,
            },
        ));
    });

    // Pass 2: member declarations, attributed by containment.
    visit_nodes(sf.tree.root_node(), &mut |node| match node.kind() {
        "field_declaration" => {
            let range = sf.tokens.range_of(node);
            let fields = build_fields(node, sf);
            if let Some(class) = innermost_mut(&mut shells, range) {
                for field in fields {
                    let name = field.name.clone();
                    if class.fields.insert(name.clone(), field).is_some() {
                        tracing::warn!(class = %class.name, field = %name, "duplicate field declaration; keeping the later one");
                    }
                }
            }
        }
        "method_declaration" => {
            let range = sf.tokens.range_of(node);
            if let Some(method) = build_method(node, sf) {
                if let Some(class) = innermost_mut(&mut shells, range) {
                    merge_method(class, method);
                }
            }
        }
        _ => {}
    });

    shells.into_iter().map(|(_, class)| class).collect()
}

/// The class whose body most tightly contains `member`.
fn innermost_mut<'a>(
    shells: &'a mut [(TokenRange, Class)],
    member: TokenRange,
) -> Option<&'a mut Class> {
    shells
        .iter_mut()
        .filter(|(body, _)| body.covers(member))
        .max_by_key(|(body, _)| body.start)
        .map(|(_, class)| class)
}

fn superclass_name_of(node: Node<'_>, source: &str) -> Option<String> {
    let superclass = node
        .child_by_field_name("superclass")
        .or_else(|| find_named_child(node, "superclass"))?;
    let mut cursor = superclass.walk();
    let result = superclass
        .named_children(&mut cursor)
        .next()
        .map(|ty| node_text(source, ty).to_string());
    result
}

fn build_fields(node: Node<'_>, sf: &SourceFile) -> Vec<Field> {
    let source = &sf.text;
    let Some(type_node) = node.child_by_field_name("type") else {
        return Vec::new();
    };

    let modifiers = match modifier_node(node) {
        Some(mods) => {
            let mut cursor = mods.walk();
            mods.children(&mut cursor)
                .map(|m| Modifier {
                    text: node_text(source, m).to_string(),
                    tokens: sf.tokens.range_of(m),
                })
                .collect()
        }
        None => Vec::new(),
    };

    let mut cursor = node.walk();
    let declarators: Vec<Node<'_>> = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "variable_declarator")
        .collect();
    let names: Vec<String> = declarators
        .iter()
        .map(|d| {
            d.child_by_field_name("name")
                .map(|n| node_text(source, n).to_string())
                .unwrap_or_default()
        })
        .collect();
    let all_declarators: Vec<TokenRange> =
        declarators.iter().map(|d| sf.tokens.range_of(*d)).collect();
    let statement_tokens = sf.tokens.range_of(node);
    let type_tokens = sf.tokens.range_of(type_node);
    let datatype = node_text(source, type_node).to_string();

    declarators
        .iter()
        .enumerate()
        .filter(|(i, _)| !names[*i].is_empty())
        .map(|(i, d)| Field {
            name: names[i].clone(),
            datatype: datatype.clone(),
            modifiers: modifiers.clone(),
            initializer: d
                .child_by_field_name("value")
                .map(|v| node_text(source, v).to_string()),
            declarator_tokens: all_declarators[i],
            statement_tokens,
            type_tokens,
            declarator_index: i,
            all_declarators: all_declarators.clone(),
            sibling_names: names
                .iter()
                .enumerate()
                .filter(|(j, n)| *j != i && !n.is_empty())
                .map(|(_, n)| n.clone())
                .collect(),
        })
        .collect()
}

fn build_method(node: Node<'_>, sf: &SourceFile) -> Option<Method> {
    let name_node = node.child_by_field_name("name")?;
    let mut body = Vec::new();
    if let Some(block) = node.child_by_field_name("body") {
        collect_body_items(block, sf, &mut body);
    }
    Some(Method {
        name: node_text(&sf.text, name_node).to_string(),
        decls: vec![sf.tokens.range_of(node)],
        body,
    })
}

fn merge_method(class: &mut Class, method: Method) {
    match class.methods.get_mut(&method.name) {
        Some(existing) => {
            existing.decls.extend(method.decls);
            existing.body.extend(method.body);
        }
        None => {
            class.methods.insert(method.name.clone(), method);
        }
    }
}

/// Record local variables and dotted expression-name chains from a method
/// body, in scan order.
fn collect_body_items(node: Node<'_>, sf: &SourceFile, out: &mut Vec<BodyItem>) {
    let source = &sf.text;
    match node.kind() {
        "local_variable_declaration" => {
            let datatype = node
                .child_by_field_name("type")
                .map(|t| node_text(source, t).to_string())
                .unwrap_or_default();
            let mut cursor = node.walk();
            let declarators: Vec<Node<'_>> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "variable_declarator")
                .collect();
            for d in &declarators {
                if let Some(name) = d.child_by_field_name("name") {
                    out.push(BodyItem::Local(LocalVariable {
                        identifier: node_text(source, name).to_string(),
                        datatype: datatype.clone(),
                    }));
                }
            }
            for d in declarators {
                if let Some(value) = d.child_by_field_name("value") {
                    collect_body_items(value, sf, out);
                }
            }
        }
        "field_access" => {
            if let Some(segments) = flatten_access_chain(node, source) {
                out.push(BodyItem::Name(ExpressionName { segments }));
                return;
            }
            // The chain starts from something other than a name (a call, an
            // array access, ...); scan its subexpressions instead.
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_body_items(child, sf, out);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_body_items(child, sf, out);
            }
        }
    }
}

/// Flatten `a.b.c` / `this.a.b` into its identifier segments; `None` when any
/// link is not a plain name.
fn flatten_access_chain(node: Node<'_>, source: &str) -> Option<Vec<String>> {
    let object = node.child_by_field_name("object")?;
    let field = node.child_by_field_name("field")?;
    let mut segments = match object.kind() {
        "identifier" => vec![node_text(source, object).to_string()],
        "this" => vec!["this".to_string()],
        "field_access" => flatten_access_chain(object, source)?,
        _ => return None,
    };
    segments.push(node_text(source, field).to_string());
    Some(segments)
}
