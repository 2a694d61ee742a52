//! Per-file import visibility.

#[derive(Clone, Debug, PartialEq, Eq)]
enum Import {
    /// `import a.b.C;`
    Single { package: String, class: String },
    /// `import a.b.*;`
    OnDemand { package: String },
}

/// A file's package declaration and import table.
///
/// Every "does this file see that class unqualified" question in the system
/// goes through [`FileInfo::sees_class`]; resolution is always evaluated from
/// the consuming file's perspective, never globally, because two files may
/// resolve the same simple name differently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// Declared package, `None` for the default package.
    pub package_name: Option<String>,
    imports: Vec<Import>,
}

impl FileInfo {
    pub fn new(package_name: Option<String>) -> Self {
        Self {
            package_name,
            imports: Vec::new(),
        }
    }

    /// Record an import by its dotted path text, `a.b.C` or (with
    /// `on_demand`) the `a.b` prefix of `a.b.*`.
    pub fn add_import(&mut self, path: &str, on_demand: bool) {
        if on_demand {
            self.imports.push(Import::OnDemand {
                package: path.to_string(),
            });
            return;
        }
        let (package, class) = match path.rsplit_once('.') {
            Some((package, class)) => (package.to_string(), class.to_string()),
            None => (String::new(), path.to_string()),
        };
        self.imports.push(Import::Single { package, class });
    }

    /// True when a class in this file can refer to `package.class` by its
    /// simple name: same package, an explicit single-type import, or an
    /// on-demand import of the whole package.
    pub fn sees_class(&self, package: &str, class: &str) -> bool {
        if self.package_name.as_deref().unwrap_or("") == package {
            return true;
        }
        self.imports.iter().any(|import| match import {
            Import::Single {
                package: p,
                class: c,
            } => p == package && c == class,
            Import::OnDemand { package: p } => p == package,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_package_needs_no_import() {
        let info = FileInfo::new(Some("com.acme".into()));
        assert!(info.sees_class("com.acme", "Widget"));
        assert!(!info.sees_class("com.other", "Widget"));
    }

    #[test]
    fn single_import_matches_exact_class_only() {
        let mut info = FileInfo::new(Some("app".into()));
        info.add_import("com.acme.Widget", false);
        assert!(info.sees_class("com.acme", "Widget"));
        assert!(!info.sees_class("com.acme", "Gadget"));
    }

    #[test]
    fn on_demand_import_matches_whole_package() {
        let mut info = FileInfo::new(Some("app".into()));
        info.add_import("com.acme", true);
        assert!(info.sees_class("com.acme", "Widget"));
        assert!(info.sees_class("com.acme", "Gadget"));
        assert!(!info.sees_class("com.acme.sub", "Widget"));
    }

    #[test]
    fn default_package_is_the_empty_name() {
        let info = FileInfo::new(None);
        assert!(info.sees_class("", "Widget"));
        assert!(!info.sees_class("com.acme", "Widget"));
    }
}
