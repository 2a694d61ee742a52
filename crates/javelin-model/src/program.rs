//! Model entity types.

use std::collections::BTreeMap;

use javelin_core::FileId;
use javelin_parse::TokenRange;

use crate::FileInfo;

/// One refactoring invocation's view of the whole file set.
#[derive(Debug, Default)]
pub struct Program {
    /// Packages keyed by name; the default package is keyed by `""`.
    pub packages: BTreeMap<String, Package>,
}

impl Program {
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Every class in the program, in deterministic (package, class) order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.packages.values().flat_map(|p| p.classes.values())
    }

    /// First class with the given simple name, searching packages in order.
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.packages.values().find_map(|p| p.classes.get(name))
    }
}

#[derive(Debug)]
pub struct Package {
    pub name: String,
    /// Class names are unique within a package.
    pub classes: BTreeMap<String, Class>,
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    /// Owning package, `""` for the default package.
    pub package_name: String,
    /// The literal `extends` name as written, simple or package-qualified.
    /// Resolution happens later, per consuming class, via [`FileInfo`].
    pub superclass_name: Option<String>,
    pub fields: BTreeMap<String, Field>,
    pub methods: BTreeMap<String, Method>,
    pub file: FileId,
    pub file_info: FileInfo,
    /// Lexical extent of the whole class declaration.
    pub tokens: TokenRange,
    /// Token index of the `{` opening the class body; redeclarations are
    /// inserted immediately after it.
    pub body_open_token: usize,
}

impl Class {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }
}

/// A modifier keyword or annotation, with its lexical extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modifier {
    pub text: String,
    pub tokens: TokenRange,
}

/// One declarator of a field declaration. A statement like `int a, b;`
/// produces two `Field`s that share `statement_tokens` and know about each
/// other through `sibling_names` / `all_declarators`.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    /// Declared type, verbatim (`int`, `List<String>`, `pkg.A`).
    pub datatype: String,
    pub modifiers: Vec<Modifier>,
    /// Initializer expression text, verbatim, when present.
    pub initializer: Option<String>,
    /// Tokens of this field's own declarator (`name` or `name = init`).
    pub declarator_tokens: TokenRange,
    /// Tokens of the whole declaration statement, `;` included.
    pub statement_tokens: TokenRange,
    /// Tokens of the declared type.
    pub type_tokens: TokenRange,
    /// Position of this declarator within its statement.
    pub declarator_index: usize,
    /// Declarator token ranges for every declarator in the statement, in
    /// declaration order.
    pub all_declarators: Vec<TokenRange>,
    /// Names of the other declarators sharing the statement.
    pub sibling_names: Vec<String>,
}

impl Field {
    pub fn has_modifier(&self, text: &str) -> bool {
        self.modifiers.iter().any(|m| m.text == text)
    }

    pub fn is_sole_declarator(&self) -> bool {
        self.sibling_names.is_empty()
    }
}

/// A method (all same-name overloads collapse into one entry; every
/// overload's declaration range and body inventory is retained).
#[derive(Clone, Debug)]
pub struct Method {
    pub name: String,
    /// Declaration token ranges, one per overload, in document order.
    pub decls: Vec<TokenRange>,
    /// Local variables and expression names from the bodies, in scan order.
    /// Order is load-bearing: usage analysis replays it.
    pub body: Vec<BodyItem>,
}

#[derive(Clone, Debug)]
pub enum BodyItem {
    Local(LocalVariable),
    Name(ExpressionName),
}

#[derive(Clone, Debug)]
pub struct LocalVariable {
    pub identifier: String,
    /// Declared type, verbatim.
    pub datatype: String,
}

/// A dot-separated chain of identifiers exactly as written, e.g.
/// `this.a.length` as `["this", "a", "length"]`. Only chains of two or more
/// segments are recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionName {
    pub segments: Vec<String>,
}

impl ExpressionName {
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}
