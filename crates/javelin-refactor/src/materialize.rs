//! Writing rewritten sources back to disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use javelin_core::FileId;
use javelin_parse::marked_path;
use thiserror::Error;

/// Pure mapping from an input path to the path its rewritten text goes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathMapping {
    /// Overwrite the input file.
    InPlace,
    /// Insert a marker before the `.java` extension:
    /// `Foo.java` becomes `Foo.re.java` for marker `re`.
    Marked(String),
}

impl Default for PathMapping {
    fn default() -> Self {
        PathMapping::Marked("re".to_string())
    }
}

impl PathMapping {
    pub fn map(&self, path: &Path) -> PathBuf {
        match self {
            PathMapping::InPlace => path.to_path_buf(),
            PathMapping::Marked(marker) => marked_path(path, marker),
        }
    }
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write every rewritten file through `mapping`.
pub fn write_changes(
    changes: &BTreeMap<FileId, String>,
    mapping: &PathMapping,
) -> Result<(), MaterializeError> {
    for (file, text) in changes {
        let path = mapping.map(Path::new(file.as_str()));
        std::fs::write(&path, text).map_err(|source| MaterializeError::Io { path, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_mapping_marks_the_extension() {
        let mapping = PathMapping::default();
        assert_eq!(
            mapping.map(Path::new("src/Foo.java")),
            PathBuf::from("src/Foo.re.java")
        );
    }

    #[test]
    fn in_place_mapping_is_identity() {
        assert_eq!(
            PathMapping::InPlace.map(Path::new("src/Foo.java")),
            PathBuf::from("src/Foo.java")
        );
    }
}
