use std::collections::BTreeSet;

use javelin_core::FileId;
use javelin_parse::SourceSet;
use javelin_refactor::{extract_class, ExtractClassError, ExtractClassParams};
use pretty_assertions::assert_eq;

fn source_set(files: &[(&str, &str)]) -> SourceSet {
    SourceSet::from_sources(
        files
            .iter()
            .map(|(name, text)| (FileId::new(*name), text.to_string())),
    )
    .unwrap()
}

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn moves_a_field_and_a_method_into_the_new_class() {
    let sources = source_set(&[(
        "Source.java",
        "class Source {\n    private int a, b;\n\n    void moved() { b = 2; }\n}\n",
    )]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: names(&["a"]),
        moved_methods: names(&["moved"]),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    private int b;\n\n    \n}\n\nclass Extracted\n{\n\tprivate int a;\n\n\tvoid moved() { b = 2; }\n}\n"
    );
}

#[test]
fn splitting_keeps_the_remaining_declarator_initializer() {
    let sources = source_set(&[(
        "Source.java",
        "class Source {\n    int a, b = 7;\n}\n",
    )]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: names(&["a"]),
        moved_methods: BTreeSet::new(),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    int b = 7;\n}\n\nclass Extracted\n{\n\tint a;\n}\n"
    );
}

#[test]
fn moved_field_redeclaration_drops_the_initializer() {
    let sources = source_set(&[(
        "Source.java",
        "class Source {\n    protected long total = 99;\n}\n",
    )]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Totals".to_string(),
        moved_fields: names(&["total"]),
        moved_methods: BTreeSet::new(),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    \n}\n\nclass Totals\n{\n\tprotected long total;\n}\n"
    );
}

#[test]
fn unknown_member_names_are_skipped() {
    let sources = source_set(&[("Source.java", "class Source {\n    int a;\n}\n")]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: names(&["missing"]),
        moved_methods: names(&["alsoMissing"]),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    int a;\n}\n\nclass Extracted\n{\n}\n"
    );
}

#[test]
fn files_without_the_source_class_pass_through_unchanged() {
    let other = "class Other {\n    int keep;\n}\n";
    let sources = source_set(&[
        ("Other.java", other),
        ("Source.java", "class Source {\n    int a;\n}\n"),
    ]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: names(&["a"]),
        moved_methods: BTreeSet::new(),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(out.get(&FileId::new("Other.java")).unwrap(), other);
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    \n}\n\nclass Extracted\n{\n\tint a;\n}\n"
    );
}

#[test]
fn all_overloads_of_a_moved_method_travel_together() {
    let sources = source_set(&[(
        "Source.java",
        "class Source {\n    void m() { }\n    void m(int x) { }\n}\n",
    )]);
    let params = ExtractClassParams {
        source_class: "Source".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: BTreeSet::new(),
        moved_methods: names(&["m"]),
    };

    let out = extract_class(&sources, &params).unwrap();
    assert_eq!(
        out.get(&FileId::new("Source.java")).unwrap(),
        "class Source {\n    \n    \n}\n\nclass Extracted\n{\n\n\tvoid m() { }\n\n\tvoid m(int x) { }\n}\n"
    );
}

#[test]
fn missing_source_class_is_an_error() {
    let sources = source_set(&[("Source.java", "class Source { }\n")]);
    let params = ExtractClassParams {
        source_class: "Nowhere".to_string(),
        new_class: "Extracted".to_string(),
        moved_fields: BTreeSet::new(),
        moved_methods: BTreeSet::new(),
    };
    assert_eq!(
        extract_class(&sources, &params),
        Err(ExtractClassError::ClassNotFound("Nowhere".to_string()))
    );
}

#[test]
fn empty_parameters_fail_before_any_traversal() {
    let sources = source_set(&[("Source.java", "class Source { }\n")]);
    let mut params = ExtractClassParams {
        source_class: String::new(),
        new_class: "Extracted".to_string(),
        moved_fields: BTreeSet::new(),
        moved_methods: BTreeSet::new(),
    };
    assert_eq!(
        extract_class(&sources, &params),
        Err(ExtractClassError::MissingSourceClass)
    );
    params.source_class = "Source".to_string();
    params.new_class = String::new();
    assert_eq!(
        extract_class(&sources, &params),
        Err(ExtractClassError::MissingNewClass)
    );
}
